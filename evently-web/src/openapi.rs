//! OpenAPI specification for the Evently API

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use crate::auth::users::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, UserInfo};
use crate::handlers::{
    CreateEventRequest, ErrorResponse, EventResponse, EventRsvpsResponse, HealthResponse,
    RsvpRequest, RsvpResponse, RsvpStatsResponse,
};

/// Main OpenAPI specification for the Evently web server
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Evently API",
        description = "Events and RSVPs with anonymous, authenticated and admin access levels",
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    servers(
        (url = "http://localhost:5000", description = "Local development server")
    ),
    paths(
        crate::handlers::health_check,

        crate::auth::handlers::register_user,
        crate::auth::handlers::login_user,
        crate::auth::handlers::get_current_user,

        crate::handlers::list_events,
        crate::handlers::get_event,
        crate::handlers::create_event,

        crate::handlers::submit_rsvp,
        crate::handlers::get_event_rsvps,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorResponse,
            RegisterRequest,
            RegisterResponse,
            LoginRequest,
            LoginResponse,
            UserInfo,
            CreateEventRequest,
            EventResponse,
            RsvpRequest,
            RsvpResponse,
            RsvpStatsResponse,
            EventRsvpsResponse,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Auth", description = "Registration and login"),
        (name = "Events", description = "Event listing and creation"),
        (name = "RSVPs", description = "Attendance declarations"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Bearer JWT security scheme
pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Get the OpenAPI specification as JSON
pub fn get_openapi_json() -> Result<String, serde_json::Error> {
    ApiDoc::openapi().to_pretty_json()
}

/// Get the OpenAPI specification as YAML
pub fn get_openapi_yaml() -> Result<String, serde_yaml::Error> {
    serde_yaml::to_string(&ApiDoc::openapi())
}

/// Serve the YAML document
pub async fn serve_openapi_yaml() -> Response {
    match get_openapi_yaml() {
        Ok(yaml) => ([(header::CONTENT_TYPE, "application/yaml")], yaml).into_response(),
        Err(e) => {
            tracing::error!("Failed to render OpenAPI YAML: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
