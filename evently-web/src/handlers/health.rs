//! Health check and service information handlers

use super::types::HealthResponse;
use axum::response::Json;
use serde_json::{json, Value};

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    summary = "Health check",
    description = "Check the server health status",
    responses(
        (status = 200, description = "Server is healthy", body = HealthResponse)
    )
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Service description with a map of the available endpoints
pub async fn service_info() -> Json<Value> {
    Json(json!({
        "name": "Evently API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Events and RSVPs with anonymous, user and admin access levels",
        "documentation": {
            "swagger_ui": "/apidocs",
            "openapi_spec": "/api/openapi.json",
            "openapi_yaml": "/api/openapi.yaml"
        },
        "endpoints": {
            "health": "/api/health",
            "auth": {
                "register": "/api/auth/register",
                "login": "/api/auth/login",
                "me": "/api/auth/me"
            },
            "events": {
                "list": "/api/events",
                "get": "/api/events/{id}",
                "create": "/api/events"
            },
            "rsvps": {
                "rsvp": "/api/rsvps/event/{event_id}",
                "get_rsvps": "/api/rsvps/event/{event_id}"
            }
        }
    }))
}
