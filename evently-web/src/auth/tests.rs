//! Tests for the authentication extractors

use super::*;
use axum::{
    body::Body,
    extract::FromRequestParts,
    http::{HeaderValue, Method, Request},
};
use chrono::{Duration, Utc};
use evently_core::{EventlyConfig, User};
use jwt::Claims;

fn test_config() -> EventlyConfig {
    let mut config = EventlyConfig::default();
    config.database.url = "memory".to_string();
    config
}

/// Helper function to create test request parts with AppState
async fn create_test_parts_with_headers(
    headers: HeaderMap,
) -> (axum::http::request::Parts, crate::AppState) {
    let mut request = Request::builder()
        .method(Method::GET)
        .uri("/test")
        .body(Body::empty())
        .unwrap();

    *request.headers_mut() = headers;

    let (parts, _) = request.into_parts();
    let state = crate::AppState::new(test_config()).await.unwrap();
    (parts, state)
}

fn headers_with_authorization(value: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("authorization", HeaderValue::from_str(value).unwrap());
    headers
}

fn token_for(state: &crate::AppState, id: i64, is_admin: bool) -> String {
    state
        .jwt
        .generate_token(&User {
            id,
            username: format!("user{id}"),
            password_hash: String::new(),
            is_admin,
            created_at: Utc::now(),
        })
        .unwrap()
}

#[tokio::test]
async fn test_auth_user_with_valid_token() {
    let (_, state) = create_test_parts_with_headers(HeaderMap::new()).await;
    let token = token_for(&state, 3, true);
    let (mut parts, _) =
        create_test_parts_with_headers(headers_with_authorization(&format!("Bearer {token}")))
            .await;

    let user = AuthUser::from_request_parts(&mut parts, &state).await.unwrap();
    assert_eq!(user.id, 3);
    assert_eq!(user.username, "user3");
    assert_eq!(user.requester(), Requester::admin(3));
}

#[tokio::test]
async fn test_auth_user_without_header() {
    let (mut parts, state) = create_test_parts_with_headers(HeaderMap::new()).await;

    let result = AuthUser::from_request_parts(&mut parts, &state).await;
    assert_eq!(result, Err(AuthError::MissingAuthHeader));
}

#[tokio::test]
async fn test_auth_user_with_wrong_scheme() {
    let (mut parts, state) =
        create_test_parts_with_headers(headers_with_authorization("Basic dXNlcjpwYXNz")).await;

    let result = AuthUser::from_request_parts(&mut parts, &state).await;
    assert_eq!(result, Err(AuthError::InvalidToken));
}

#[tokio::test]
async fn test_resolver_falls_back_to_anonymous() {
    let (_, state) = create_test_parts_with_headers(HeaderMap::new()).await;

    let mut expired = Claims::for_user(
        &User {
            id: 9,
            username: "late".to_string(),
            password_hash: String::new(),
            is_admin: false,
            created_at: Utc::now(),
        },
        Duration::minutes(1),
    );
    expired.exp -= 3600;
    let expired = state.jwt.encode_claims(&expired).unwrap();

    let mut non_numeric = Claims::for_user(
        &User {
            id: 10,
            username: "odd".to_string(),
            password_hash: String::new(),
            is_admin: true,
            created_at: Utc::now(),
        },
        Duration::minutes(5),
    );
    non_numeric.sub = "ten".to_string();
    let non_numeric = state.jwt.encode_claims(&non_numeric).unwrap();

    let cases = [
        HeaderMap::new(),
        headers_with_authorization("Bearer"),
        headers_with_authorization("Bearer garbage"),
        headers_with_authorization(&format!("Bearer {expired}")),
        headers_with_authorization(&format!("Bearer {non_numeric}")),
        headers_with_authorization("Token abc"),
    ];

    for headers in cases {
        let (mut parts, _) = create_test_parts_with_headers(headers).await;
        let ResolvedRequester(requester) = ResolvedRequester::from_request_parts(&mut parts, &state)
            .await
            .unwrap();
        assert_eq!(requester, Requester::Anonymous);
    }
}

#[tokio::test]
async fn test_resolver_with_valid_token() {
    let (_, state) = create_test_parts_with_headers(HeaderMap::new()).await;
    let token = token_for(&state, 4, false);

    let requester = resolve_requester(
        &headers_with_authorization(&format!("Bearer {token}")),
        &state.jwt,
    );
    assert_eq!(requester, Requester::user(4));
}
