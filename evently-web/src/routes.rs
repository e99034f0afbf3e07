//! Route definitions for the Evently web server

use crate::{auth, handlers, openapi, AppState};
use axum::{
    routing::{get, post},
    Router,
};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Authentication
        .route("/auth/register", post(auth::handlers::register_user))
        .route("/auth/login", post(auth::handlers::login_user))
        .route("/auth/me", get(auth::handlers::get_current_user))
        // Events
        .route(
            "/events",
            get(handlers::list_events).post(handlers::create_event),
        )
        .route("/events/{event_id}", get(handlers::get_event))
        // RSVPs
        .route(
            "/rsvps/event/{event_id}",
            get(handlers::get_event_rsvps).post(handlers::submit_rsvp),
        )
        // The JSON document is served by the Swagger UI router
        .route("/openapi.yaml", get(openapi::serve_openapi_yaml))
}
