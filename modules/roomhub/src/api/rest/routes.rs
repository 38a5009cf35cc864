use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};

use crate::api::rest::handlers;
use crate::domain::service::Service;

/// Mount every roomhub endpoint on `router`. The service reaches handlers as an `Extension`.
pub fn register_routes(router: Router, service: Arc<Service>) -> Router {
    router
        // Events
        .route(
            "/api/events",
            get(handlers::list_events).post(handlers::create_event),
        )
        .route("/api/events/today", get(handlers::list_todays_events))
        .route("/api/events/conflicts", post(handlers::check_conflicts))
        .route(
            "/api/events/{id}",
            get(handlers::get_event)
                .put(handlers::update_event)
                .delete(handlers::delete_event),
        )
        // Reminders
        .route(
            "/api/reminders",
            get(handlers::list_reminders).post(handlers::create_reminder),
        )
        .route(
            "/api/reminders/{id}",
            get(handlers::get_reminder)
                .put(handlers::update_reminder)
                .delete(handlers::delete_reminder),
        )
        // Guests
        .route(
            "/api/guests",
            get(handlers::list_guests).post(handlers::create_guest),
        )
        .route("/api/guests/today", get(handlers::list_todays_guests))
        .route(
            "/api/guests/{id}",
            get(handlers::get_guest)
                .put(handlers::update_guest)
                .delete(handlers::delete_guest),
        )
        // System status
        .route("/api/system-status", get(handlers::list_system_statuses))
        .route(
            "/api/system-status/{name}",
            get(handlers::get_system_status).put(handlers::update_system_status),
        )
        .route(
            "/api/system-status/{name}/adjust",
            post(handlers::adjust_system_status),
        )
        // Users
        .route("/api/users/{id}", get(handlers::get_user))
        .route(
            "/api/users/by-username/{username}",
            get(handlers::get_user_by_username),
        )
        .layer(Extension(service))
}
