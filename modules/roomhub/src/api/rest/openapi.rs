use utoipa::OpenApi;

use crate::api::rest::{dto, handlers, problem};

#[derive(OpenApi)]
#[openapi(
    info(title = "Roomhub API", description = "Shared calendar, reminders, guests and home status for a household"),
    paths(
        handlers::list_events,
        handlers::list_todays_events,
        handlers::get_event,
        handlers::create_event,
        handlers::update_event,
        handlers::delete_event,
        handlers::check_conflicts,
        handlers::list_reminders,
        handlers::get_reminder,
        handlers::create_reminder,
        handlers::update_reminder,
        handlers::delete_reminder,
        handlers::list_guests,
        handlers::list_todays_guests,
        handlers::get_guest,
        handlers::create_guest,
        handlers::update_guest,
        handlers::delete_guest,
        handlers::list_system_statuses,
        handlers::get_system_status,
        handlers::update_system_status,
        handlers::adjust_system_status,
        handlers::get_user,
        handlers::get_user_by_username,
    ),
    components(schemas(
        problem::Problem,
        problem::ValidationError,
        dto::EventDto,
        dto::CreateEventReq,
        dto::ConflictCheckDto
    )),
    tags(
        (name = "events", description = "Shared-space reservations"),
        (name = "reminders", description = "Notes between roommates"),
        (name = "guests", description = "Expected visitors"),
        (name = "system-status", description = "Simulated smart-home devices"),
        (name = "users", description = "Roommate profiles"),
    )
)]
pub struct RoomhubApiDoc;

/// The roomhub OpenAPI document.
pub fn openapi() -> utoipa::openapi::OpenApi {
    RoomhubApiDoc::openapi()
}
