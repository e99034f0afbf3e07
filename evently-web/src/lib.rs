//! Evently Web Server
//!
//! HTTP surface for events and RSVPs. Requests are authenticated here and
//! handed to `evently-core` for the admission decision.

pub mod auth;
pub mod database;
pub mod handlers;
pub mod openapi;
pub mod routes;
pub mod server;
pub mod state;

// Re-export main types
pub use server::{EventlyServer, EventlyServerBuilder};
pub use state::AppState;

use auth::jwt::AuthError;
use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use evently_core::{AdmissionError, EventlyError};
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create the main application router
pub fn create_app(state: AppState) -> Router {
    let body_limit = state.config.server.body_limit_bytes;

    Router::new()
        .route("/", get(handlers::service_info))
        .nest("/api", routes::api_routes())
        // Swagger UI, also serves /api/openapi.json
        .merge(SwaggerUi::new("/apidocs").url("/api/openapi.json", openapi::ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// Error types for the web server
#[derive(thiserror::Error, Debug)]
pub enum WebError {
    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),

    #[error(transparent)]
    Domain(#[from] EventlyError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("{0}")]
    BadRequest(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for web operations
pub type WebResult<T> = Result<T, WebError>;

impl WebError {
    /// HTTP status and client-facing message
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            WebError::Domain(EventlyError::Admission(reason)) => {
                let status = match reason {
                    AdmissionError::AuthenticationRequired => StatusCode::UNAUTHORIZED,
                    AdmissionError::AdminRequired => StatusCode::FORBIDDEN,
                    AdmissionError::CapacityExceeded { .. } => StatusCode::BAD_REQUEST,
                };
                (status, reason.to_string())
            }
            WebError::Domain(EventlyError::NotFound { resource, .. }) => {
                (StatusCode::NOT_FOUND, format!("Not found: {}", resource))
            }
            WebError::Domain(EventlyError::Validation { message, .. })
            | WebError::Domain(EventlyError::Conflict { message, .. }) => {
                (StatusCode::BAD_REQUEST, message.clone())
            }
            WebError::Domain(EventlyError::Authentication { message, .. }) => {
                (StatusCode::UNAUTHORIZED, message.clone())
            }
            WebError::BadRequest(message) => (StatusCode::BAD_REQUEST, message.clone()),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        match self {
            WebError::Auth(error) => return error.into_response(),
            WebError::Domain(ref error) => error.log(),
            ref other => tracing::error!(error = %other, "Request failed"),
        }

        let (status, message) = self.status_and_message();
        (status, Json(json!({ "error": message }))).into_response()
    }
}
