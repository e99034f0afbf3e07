//! Authentication handlers for user registration, login and the current user

use super::{
    users::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, UserInfo},
    AuthUser,
};
use crate::{handlers::ErrorResponse, AppState, WebResult};
use axum::{extract::State, http::StatusCode, response::Json, Json as JsonExtractor};
use tracing::info;

/// User registration endpoint
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    summary = "Register a user",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = RegisterResponse),
        (status = 400, description = "Missing fields, short password or duplicate username", body = ErrorResponse)
    )
)]
pub async fn register_user(
    State(app_state): State<AppState>,
    JsonExtractor(request): JsonExtractor<RegisterRequest>,
) -> WebResult<(StatusCode, Json<RegisterResponse>)> {
    info!("User registration attempt: {}", request.username);

    let user = app_state.user_service.register(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User created successfully".to_string(),
            user,
        }),
    ))
}

/// User login endpoint
///
/// Returns a bearer access token together with the user.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    summary = "Log in",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Missing fields", body = ErrorResponse),
        (status = 401, description = "Invalid username or password", body = ErrorResponse)
    )
)]
pub async fn login_user(
    State(app_state): State<AppState>,
    JsonExtractor(request): JsonExtractor<LoginRequest>,
) -> WebResult<Json<LoginResponse>> {
    info!("User login attempt: {}", request.username);

    let response = app_state.user_service.login(request).await?;

    info!("User logged in successfully: {}", response.user.username);
    Ok(Json(response))
}

/// Get current user information
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Auth",
    summary = "Current user",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The authenticated user", body = UserInfo),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn get_current_user(
    State(app_state): State<AppState>,
    user: AuthUser,
) -> WebResult<Json<UserInfo>> {
    Ok(Json(app_state.user_service.get_user(user.id).await?))
}
