//! JWT issuance and verification

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{Duration, Utc};
use evently_core::{AuthConfig, Requester, User};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, warn};

/// JWT signing and verification keys
struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl Keys {
    fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }
}

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    pub username: String,
    pub is_admin: bool,
    /// Issued at (timestamp)
    pub iat: i64,
    /// Expiration time (timestamp)
    pub exp: i64,
}

impl Claims {
    /// Claims for an access token issued now
    pub fn for_user(user: &User, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: user.id.to_string(),
            username: user.username.clone(),
            is_admin: user.is_admin,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }

    /// Requester identified by these claims, if the subject is a user id
    pub fn requester(&self) -> Option<Requester> {
        self.sub
            .parse()
            .ok()
            .map(|user_id| Requester::Authenticated {
                user_id,
                is_admin: self.is_admin,
            })
    }
}

/// Authentication errors
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("Username and password are required")]
    MissingCredentials,
    #[error("Token creation failed")]
    TokenCreation,
    #[error("Password hashing failed")]
    PasswordHash,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token has expired")]
    TokenExpired,
    #[error("Missing Authorization Header")]
    MissingAuthHeader,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match self {
            AuthError::MissingCredentials => StatusCode::BAD_REQUEST,
            AuthError::TokenCreation | AuthError::PasswordHash => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AuthError::InvalidCredentials
            | AuthError::InvalidToken
            | AuthError::TokenExpired
            | AuthError::MissingAuthHeader => StatusCode::UNAUTHORIZED,
        };

        // Token problems keep the `msg` key clients of the bearer scheme expect
        let body = match self {
            AuthError::InvalidToken | AuthError::TokenExpired | AuthError::MissingAuthHeader => {
                json!({ "msg": self.to_string() })
            }
            _ => json!({ "error": self.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

/// Token issuance bound to the configured secret and lifetime
#[derive(Clone)]
pub struct JwtService {
    keys: Arc<Keys>,
    ttl: Duration,
}

impl JwtService {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            keys: Arc::new(Keys::new(config.jwt_secret.as_bytes())),
            ttl: Duration::minutes(config.token_ttl_minutes),
        }
    }

    /// Token lifetime in seconds
    pub fn expires_in(&self) -> i64 {
        self.ttl.num_seconds()
    }

    /// Generate access token
    pub fn generate_token(&self, user: &User) -> Result<String, AuthError> {
        self.encode_claims(&Claims::for_user(user, self.ttl))
    }

    pub(crate) fn encode_claims(&self, claims: &Claims) -> Result<String, AuthError> {
        encode(&Header::default(), claims, &self.keys.encoding).map_err(|e| {
            warn!("Failed to encode JWT token: {}", e);
            AuthError::TokenCreation
        })
    }

    /// Verify and decode token
    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.keys.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| {
                debug!("Token verification failed: {}", e);
                match e.kind() {
                    ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                    _ => AuthError::InvalidToken,
                }
            })
    }
}
