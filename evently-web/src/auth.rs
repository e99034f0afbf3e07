//! Authentication extractors
//!
//! Two ways to identify the caller: [`AuthUser`] rejects requests without a
//! valid bearer token, [`ResolvedRequester`] never rejects and falls back to
//! [`Requester::Anonymous`].

pub mod handlers;
pub mod jwt;
pub mod users;

#[cfg(test)]
mod tests;

use crate::AppState;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use evently_core::{Requester, UserId};
use jwt::{AuthError, JwtService};
use tracing::debug;

/// Authenticated caller taken from a verified access token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: UserId,
    pub username: String,
    pub is_admin: bool,
}

impl AuthUser {
    pub fn requester(&self) -> Requester {
        Requester::Authenticated {
            user_id: self.id,
            is_admin: self.is_admin,
        }
    }
}

/// Bearer token from the `Authorization` header
fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidToken)?;

    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::InvalidToken)
}

fn authenticate(headers: &HeaderMap, jwt: &JwtService) -> Result<AuthUser, AuthError> {
    let claims = jwt.verify_token(bearer_token(headers)?)?;
    let id = claims.sub.parse().map_err(|_| AuthError::InvalidToken)?;

    Ok(AuthUser {
        id,
        username: claims.username,
        is_admin: claims.is_admin,
    })
}

/// Identify the caller without ever failing
///
/// Missing, malformed, expired or foreign tokens all resolve to
/// [`Requester::Anonymous`].
pub fn resolve_requester(headers: &HeaderMap, jwt: &JwtService) -> Requester {
    match authenticate(headers, jwt) {
        Ok(user) => user.requester(),
        Err(AuthError::MissingAuthHeader) => Requester::Anonymous,
        Err(e) => {
            debug!("Treating request as anonymous: {}", e);
            Requester::Anonymous
        }
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        authenticate(&parts.headers, &app_state.jwt)
    }
}

/// Optional authentication - resolves to anonymous instead of rejecting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedRequester(pub Requester);

impl<S> FromRequestParts<S> for ResolvedRequester
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        Ok(ResolvedRequester(resolve_requester(
            &parts.headers,
            &app_state.jwt,
        )))
    }
}
