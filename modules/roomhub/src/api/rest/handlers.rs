use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query,
    },
    http::{StatusCode, Uri},
    response::Json,
    Extension,
};
use tracing::{error, info};

use crate::api::rest::dto::{
    AdjustReq, ConflictCheckDto, ConflictCheckReq, CreateEventReq, CreateGuestReq,
    CreateReminderReq, EventDto, GuestDto, ListEventsQuery, ListGuestsQuery, ListRemindersQuery,
    ReminderDto, SystemStatusDto, UpdateEventReq, UpdateGuestReq, UpdateReminderReq,
    UpdateSystemStatusReq, UserDto,
};
use crate::api::rest::error::{map_domain_error, map_json_rejection, map_query_rejection};
use crate::api::rest::problem::{Problem, ProblemResponse};
use crate::contract::model::{
    Adjustment, EventFilter, EventPatch, GuestFilter, GuestPatch, NewEvent, NewGuest,
    NewReminder, ReminderFilter, ReminderPatch, SystemStatusPatch,
};
use crate::domain::error::DomainError;
use crate::domain::service::Service;

type Svc = Extension<Arc<Service>>;

fn body<T>(payload: Result<Json<T>, JsonRejection>, uri: &Uri) -> Result<T, ProblemResponse> {
    match payload {
        Ok(Json(v)) => Ok(v),
        Err(rejection) => {
            error!("Rejected request body: {}", rejection.body_text());
            Err(map_json_rejection(&rejection, uri.path()))
        }
    }
}

fn query<T>(q: Result<Query<T>, QueryRejection>, uri: &Uri) -> Result<T, ProblemResponse> {
    match q {
        Ok(Query(v)) => Ok(v),
        Err(rejection) => {
            error!("Rejected query string: {}", rejection.body_text());
            Err(map_query_rejection(&rejection, uri.path()))
        }
    }
}

fn failed(e: &DomainError, uri: &Uri) -> ProblemResponse {
    error!("Request failed: {}", e);
    map_domain_error(e, uri.path())
}

// ---------------------------------------------------------------- events

/// List events with optional filters
#[utoipa::path(
    get,
    path = "/api/events",
    tag = "events",
    params(ListEventsQuery),
    responses(
        (status = 200, description = "Events in id order", body = [EventDto]),
        (status = 400, description = "Bad Request", body = Problem, content_type = "application/problem+json"),
        (status = 500, description = "Internal Server Error", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn list_events(
    Extension(svc): Svc,
    uri: Uri,
    q: Result<Query<ListEventsQuery>, QueryRejection>,
) -> Result<Json<Vec<EventDto>>, ProblemResponse> {
    let q = query(q, &uri)?;
    info!("Listing events with query: {:?}", q);

    let filter = EventFilter::try_from(q).map_err(|e| failed(&e, &uri))?;
    match svc.list_events(filter).await {
        Ok(events) => Ok(Json(events.into_iter().map(EventDto::from).collect())),
        Err(e) => Err(failed(&e, &uri)),
    }
}

/// Events scheduled for today (UTC)
#[utoipa::path(
    get,
    path = "/api/events/today",
    tag = "events",
    responses(
        (status = 200, description = "Today's events", body = [EventDto]),
        (status = 500, description = "Internal Server Error", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn list_todays_events(
    Extension(svc): Svc,
    uri: Uri,
) -> Result<Json<Vec<EventDto>>, ProblemResponse> {
    info!("Listing today's events");

    match svc.list_todays_events().await {
        Ok(events) => Ok(Json(events.into_iter().map(EventDto::from).collect())),
        Err(e) => Err(failed(&e, &uri)),
    }
}

/// Get a specific event by id
#[utoipa::path(
    get,
    path = "/api/events/{id}",
    tag = "events",
    params(("id" = i64, Path, description = "Event id")),
    responses(
        (status = 200, description = "Event found", body = EventDto),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn get_event(
    Extension(svc): Svc,
    Path(id): Path<i64>,
    uri: Uri,
) -> Result<Json<EventDto>, ProblemResponse> {
    info!("Getting event with id: {}", id);

    match svc.get_event(id).await {
        Ok(event) => Ok(Json(EventDto::from(event))),
        Err(e) => Err(failed(&e, &uri)),
    }
}

/// Create a new event
#[utoipa::path(
    post,
    path = "/api/events",
    tag = "events",
    request_body = CreateEventReq,
    responses(
        (status = 201, description = "Created event", body = EventDto),
        (status = 400, description = "Bad Request", body = Problem, content_type = "application/problem+json"),
        (status = 409, description = "Schedule conflict", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn create_event(
    Extension(svc): Svc,
    uri: Uri,
    payload: Result<Json<CreateEventReq>, JsonRejection>,
) -> Result<(StatusCode, Json<EventDto>), ProblemResponse> {
    let req = body(payload, &uri)?;
    info!("Creating event: {:?}", req);

    let new_event = NewEvent::try_from(req).map_err(|e| failed(&e, &uri))?;
    match svc.create_event(new_event).await {
        Ok(event) => Ok((StatusCode::CREATED, Json(EventDto::from(event)))),
        Err(e) => Err(failed(&e, &uri)),
    }
}

/// Update an existing event
#[utoipa::path(
    put,
    path = "/api/events/{id}",
    tag = "events",
    params(("id" = i64, Path, description = "Event id")),
    request_body = UpdateEventReq,
    responses(
        (status = 200, description = "Updated event", body = EventDto),
        (status = 400, description = "Bad Request", body = Problem, content_type = "application/problem+json"),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json"),
        (status = 409, description = "Schedule conflict", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn update_event(
    Extension(svc): Svc,
    Path(id): Path<i64>,
    uri: Uri,
    payload: Result<Json<UpdateEventReq>, JsonRejection>,
) -> Result<Json<EventDto>, ProblemResponse> {
    let req = body(payload, &uri)?;
    info!("Updating event {} with: {:?}", id, req);

    let patch = EventPatch::try_from(req).map_err(|e| failed(&e, &uri))?;
    match svc.update_event(id, patch).await {
        Ok(event) => Ok(Json(EventDto::from(event))),
        Err(e) => Err(failed(&e, &uri)),
    }
}

/// Delete an event by id
#[utoipa::path(
    delete,
    path = "/api/events/{id}",
    tag = "events",
    params(("id" = i64, Path, description = "Event id")),
    responses(
        (status = 204, description = "Event deleted"),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn delete_event(
    Extension(svc): Svc,
    Path(id): Path<i64>,
    uri: Uri,
) -> Result<StatusCode, ProblemResponse> {
    info!("Deleting event: {}", id);

    match svc.delete_event(id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e) => Err(failed(&e, &uri)),
    }
}

/// Check a candidate reservation against the calendar without saving it
#[utoipa::path(
    post,
    path = "/api/events/conflicts",
    tag = "events",
    request_body = ConflictCheckReq,
    responses(
        (status = 200, description = "Conflicting events, possibly none", body = ConflictCheckDto),
        (status = 400, description = "Bad Request", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn check_conflicts(
    Extension(svc): Svc,
    uri: Uri,
    payload: Result<Json<ConflictCheckReq>, JsonRejection>,
) -> Result<Json<ConflictCheckDto>, ProblemResponse> {
    let req = body(payload, &uri)?;
    info!("Checking conflicts for: {:?}", req);

    let (candidate, exclude_id) = req.into_candidate().map_err(|e| failed(&e, &uri))?;
    match svc.find_conflicts(&candidate, exclude_id).await {
        Ok(conflicts) => Ok(Json(ConflictCheckDto::from(conflicts))),
        Err(e) => Err(failed(&e, &uri)),
    }
}

// ---------------------------------------------------------------- reminders

/// List reminders with optional filters
#[utoipa::path(
    get,
    path = "/api/reminders",
    tag = "reminders",
    params(ListRemindersQuery),
    responses(
        (status = 200, description = "Reminders in id order", body = [ReminderDto]),
        (status = 400, description = "Bad Request", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn list_reminders(
    Extension(svc): Svc,
    uri: Uri,
    q: Result<Query<ListRemindersQuery>, QueryRejection>,
) -> Result<Json<Vec<ReminderDto>>, ProblemResponse> {
    let q = query(q, &uri)?;
    info!("Listing reminders with query: {:?}", q);

    let filter = ReminderFilter::try_from(q).map_err(|e| failed(&e, &uri))?;
    match svc.list_reminders(filter).await {
        Ok(items) => Ok(Json(items.into_iter().map(ReminderDto::from).collect())),
        Err(e) => Err(failed(&e, &uri)),
    }
}

#[utoipa::path(
    get,
    path = "/api/reminders/{id}",
    tag = "reminders",
    params(("id" = i64, Path, description = "Reminder id")),
    responses(
        (status = 200, description = "Reminder found", body = ReminderDto),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn get_reminder(
    Extension(svc): Svc,
    Path(id): Path<i64>,
    uri: Uri,
) -> Result<Json<ReminderDto>, ProblemResponse> {
    info!("Getting reminder with id: {}", id);

    match svc.get_reminder(id).await {
        Ok(r) => Ok(Json(ReminderDto::from(r))),
        Err(e) => Err(failed(&e, &uri)),
    }
}

#[utoipa::path(
    post,
    path = "/api/reminders",
    tag = "reminders",
    request_body = CreateReminderReq,
    responses(
        (status = 201, description = "Created reminder", body = ReminderDto),
        (status = 400, description = "Bad Request", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn create_reminder(
    Extension(svc): Svc,
    uri: Uri,
    payload: Result<Json<CreateReminderReq>, JsonRejection>,
) -> Result<(StatusCode, Json<ReminderDto>), ProblemResponse> {
    let req = body(payload, &uri)?;
    info!("Creating reminder: {:?}", req);

    let new_reminder = NewReminder::try_from(req).map_err(|e| failed(&e, &uri))?;
    match svc.create_reminder(new_reminder).await {
        Ok(r) => Ok((StatusCode::CREATED, Json(ReminderDto::from(r)))),
        Err(e) => Err(failed(&e, &uri)),
    }
}

#[utoipa::path(
    put,
    path = "/api/reminders/{id}",
    tag = "reminders",
    params(("id" = i64, Path, description = "Reminder id")),
    request_body = UpdateReminderReq,
    responses(
        (status = 200, description = "Updated reminder", body = ReminderDto),
        (status = 400, description = "Bad Request", body = Problem, content_type = "application/problem+json"),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn update_reminder(
    Extension(svc): Svc,
    Path(id): Path<i64>,
    uri: Uri,
    payload: Result<Json<UpdateReminderReq>, JsonRejection>,
) -> Result<Json<ReminderDto>, ProblemResponse> {
    let req = body(payload, &uri)?;
    info!("Updating reminder {} with: {:?}", id, req);

    let patch = ReminderPatch::try_from(req).map_err(|e| failed(&e, &uri))?;
    match svc.update_reminder(id, patch).await {
        Ok(r) => Ok(Json(ReminderDto::from(r))),
        Err(e) => Err(failed(&e, &uri)),
    }
}

#[utoipa::path(
    delete,
    path = "/api/reminders/{id}",
    tag = "reminders",
    params(("id" = i64, Path, description = "Reminder id")),
    responses(
        (status = 204, description = "Reminder deleted"),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn delete_reminder(
    Extension(svc): Svc,
    Path(id): Path<i64>,
    uri: Uri,
) -> Result<StatusCode, ProblemResponse> {
    info!("Deleting reminder: {}", id);

    match svc.delete_reminder(id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e) => Err(failed(&e, &uri)),
    }
}

// ---------------------------------------------------------------- guests

#[utoipa::path(
    get,
    path = "/api/guests",
    tag = "guests",
    params(ListGuestsQuery),
    responses(
        (status = 200, description = "Guests in id order", body = [GuestDto]),
        (status = 400, description = "Bad Request", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn list_guests(
    Extension(svc): Svc,
    uri: Uri,
    q: Result<Query<ListGuestsQuery>, QueryRejection>,
) -> Result<Json<Vec<GuestDto>>, ProblemResponse> {
    let q = query(q, &uri)?;
    info!("Listing guests with query: {:?}", q);

    let filter = GuestFilter::try_from(q).map_err(|e| failed(&e, &uri))?;
    match svc.list_guests(filter).await {
        Ok(items) => Ok(Json(items.into_iter().map(GuestDto::from).collect())),
        Err(e) => Err(failed(&e, &uri)),
    }
}

/// Guests visiting today (UTC)
#[utoipa::path(
    get,
    path = "/api/guests/today",
    tag = "guests",
    responses(
        (status = 200, description = "Today's guests", body = [GuestDto]),
    )
)]
pub async fn list_todays_guests(
    Extension(svc): Svc,
    uri: Uri,
) -> Result<Json<Vec<GuestDto>>, ProblemResponse> {
    info!("Listing today's guests");

    match svc.list_todays_guests().await {
        Ok(items) => Ok(Json(items.into_iter().map(GuestDto::from).collect())),
        Err(e) => Err(failed(&e, &uri)),
    }
}

#[utoipa::path(
    get,
    path = "/api/guests/{id}",
    tag = "guests",
    params(("id" = i64, Path, description = "Guest id")),
    responses(
        (status = 200, description = "Guest found", body = GuestDto),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn get_guest(
    Extension(svc): Svc,
    Path(id): Path<i64>,
    uri: Uri,
) -> Result<Json<GuestDto>, ProblemResponse> {
    info!("Getting guest with id: {}", id);

    match svc.get_guest(id).await {
        Ok(g) => Ok(Json(GuestDto::from(g))),
        Err(e) => Err(failed(&e, &uri)),
    }
}

#[utoipa::path(
    post,
    path = "/api/guests",
    tag = "guests",
    request_body = CreateGuestReq,
    responses(
        (status = 201, description = "Registered guest", body = GuestDto),
        (status = 400, description = "Bad Request", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn create_guest(
    Extension(svc): Svc,
    uri: Uri,
    payload: Result<Json<CreateGuestReq>, JsonRejection>,
) -> Result<(StatusCode, Json<GuestDto>), ProblemResponse> {
    let req = body(payload, &uri)?;
    info!("Registering guest: {:?}", req);

    let new_guest = NewGuest::try_from(req).map_err(|e| failed(&e, &uri))?;
    match svc.create_guest(new_guest).await {
        Ok(g) => Ok((StatusCode::CREATED, Json(GuestDto::from(g)))),
        Err(e) => Err(failed(&e, &uri)),
    }
}

#[utoipa::path(
    put,
    path = "/api/guests/{id}",
    tag = "guests",
    params(("id" = i64, Path, description = "Guest id")),
    request_body = UpdateGuestReq,
    responses(
        (status = 200, description = "Updated guest", body = GuestDto),
        (status = 400, description = "Bad Request", body = Problem, content_type = "application/problem+json"),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn update_guest(
    Extension(svc): Svc,
    Path(id): Path<i64>,
    uri: Uri,
    payload: Result<Json<UpdateGuestReq>, JsonRejection>,
) -> Result<Json<GuestDto>, ProblemResponse> {
    let req = body(payload, &uri)?;
    info!("Updating guest {} with: {:?}", id, req);

    let patch = GuestPatch::try_from(req).map_err(|e| failed(&e, &uri))?;
    match svc.update_guest(id, patch).await {
        Ok(g) => Ok(Json(GuestDto::from(g))),
        Err(e) => Err(failed(&e, &uri)),
    }
}

#[utoipa::path(
    delete,
    path = "/api/guests/{id}",
    tag = "guests",
    params(("id" = i64, Path, description = "Guest id")),
    responses(
        (status = 204, description = "Guest deleted"),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn delete_guest(
    Extension(svc): Svc,
    Path(id): Path<i64>,
    uri: Uri,
) -> Result<StatusCode, ProblemResponse> {
    info!("Deleting guest: {}", id);

    match svc.delete_guest(id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e) => Err(failed(&e, &uri)),
    }
}

// ---------------------------------------------------------------- system status

#[utoipa::path(
    get,
    path = "/api/system-status",
    tag = "system-status",
    responses(
        (status = 200, description = "All device statuses", body = [SystemStatusDto]),
    )
)]
pub async fn list_system_statuses(
    Extension(svc): Svc,
    uri: Uri,
) -> Result<Json<Vec<SystemStatusDto>>, ProblemResponse> {
    info!("Listing system statuses");

    match svc.list_system_statuses().await {
        Ok(items) => Ok(Json(items.into_iter().map(SystemStatusDto::from).collect())),
        Err(e) => Err(failed(&e, &uri)),
    }
}

#[utoipa::path(
    get,
    path = "/api/system-status/{name}",
    tag = "system-status",
    params(("name" = String, Path, description = "Device name, e.g. temperature")),
    responses(
        (status = 200, description = "Status found", body = SystemStatusDto),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn get_system_status(
    Extension(svc): Svc,
    Path(name): Path<String>,
    uri: Uri,
) -> Result<Json<SystemStatusDto>, ProblemResponse> {
    info!("Getting system status: {}", name);

    match svc.get_system_status(&name).await {
        Ok(s) => Ok(Json(SystemStatusDto::from(s))),
        Err(e) => Err(failed(&e, &uri)),
    }
}

#[utoipa::path(
    put,
    path = "/api/system-status/{name}",
    tag = "system-status",
    params(("name" = String, Path, description = "Device name")),
    request_body = UpdateSystemStatusReq,
    responses(
        (status = 200, description = "Updated status", body = SystemStatusDto),
        (status = 400, description = "Bad Request", body = Problem, content_type = "application/problem+json"),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn update_system_status(
    Extension(svc): Svc,
    Path(name): Path<String>,
    uri: Uri,
    payload: Result<Json<UpdateSystemStatusReq>, JsonRejection>,
) -> Result<Json<SystemStatusDto>, ProblemResponse> {
    let req = body(payload, &uri)?;
    info!("Updating system status {} with: {:?}", name, req);

    let patch = SystemStatusPatch::try_from(req).map_err(|e| failed(&e, &uri))?;
    match svc.update_system_status(&name, patch).await {
        Ok(s) => Ok(Json(SystemStatusDto::from(s))),
        Err(e) => Err(failed(&e, &uri)),
    }
}

/// Step a device's numeric value (the thermostat) up or down by one degree
#[utoipa::path(
    post,
    path = "/api/system-status/{name}/adjust",
    tag = "system-status",
    params(("name" = String, Path, description = "Device name")),
    request_body = AdjustReq,
    responses(
        (status = 200, description = "Adjusted status", body = SystemStatusDto),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json"),
        (status = 422, description = "Value is not numeric", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn adjust_system_status(
    Extension(svc): Svc,
    Path(name): Path<String>,
    uri: Uri,
    payload: Result<Json<AdjustReq>, JsonRejection>,
) -> Result<Json<SystemStatusDto>, ProblemResponse> {
    let req = body(payload, &uri)?;
    info!("Adjusting system status {}: {:?}", name, req);

    let direction = Adjustment::try_from(req).map_err(|e| failed(&e, &uri))?;
    match svc.adjust_temperature(&name, direction).await {
        Ok(s) => Ok(Json(SystemStatusDto::from(s))),
        Err(e) => Err(failed(&e, &uri)),
    }
}

// ---------------------------------------------------------------- users

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "User found", body = UserDto),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn get_user(
    Extension(svc): Svc,
    Path(id): Path<i64>,
    uri: Uri,
) -> Result<Json<UserDto>, ProblemResponse> {
    info!("Getting user with id: {}", id);

    match svc.get_user(id).await {
        Ok(u) => Ok(Json(UserDto::from(u))),
        Err(e) => Err(failed(&e, &uri)),
    }
}

#[utoipa::path(
    get,
    path = "/api/users/by-username/{username}",
    tag = "users",
    params(("username" = String, Path, description = "Login name")),
    responses(
        (status = 200, description = "User found", body = UserDto),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn get_user_by_username(
    Extension(svc): Svc,
    Path(username): Path<String>,
    uri: Uri,
) -> Result<Json<UserDto>, ProblemResponse> {
    info!("Getting user by username: {}", username);

    match svc.get_user_by_username(&username).await {
        Ok(u) => Ok(Json(UserDto::from(u))),
        Err(e) => Err(failed(&e, &uri)),
    }
}
