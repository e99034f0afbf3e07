//! User management and authentication

use super::jwt::{AuthError, JwtService};
use crate::WebResult;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use evently_core::{
    not_found_error, validation_error, BootstrapAdmin, EventlyStore, NewUser, User, UserId,
    UserStore,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};
use utoipa::ToSchema;

/// Shortest password accepted at registration
pub const MIN_PASSWORD_LEN: usize = 6;

/// User registration request
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct RegisterRequest {
    #[serde(default)]
    #[schema(example = "alice")]
    pub username: String,
    #[serde(default)]
    #[schema(example = "secret123")]
    pub password: String,
}

/// User login request
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    #[schema(example = "alice")]
    pub username: String,
    #[serde(default)]
    #[schema(example = "secret123")]
    pub password: String,
}

/// Public user information
#[derive(Debug, Serialize, Clone, PartialEq, ToSchema)]
pub struct UserInfo {
    #[schema(example = 1)]
    pub id: UserId,
    #[schema(example = "alice")]
    pub username: String,
    pub is_admin: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            is_admin: user.is_admin,
            created_at: user.created_at,
        }
    }
}

/// Registration response
#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterResponse {
    #[schema(example = "User created successfully")]
    pub message: String,
    pub user: UserInfo,
}

/// Login response
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Seconds until the access token expires
    #[schema(example = 3600)]
    pub expires_in: i64,
    pub user: UserInfo,
}

/// User service for authentication operations
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn EventlyStore>,
    jwt: JwtService,
}

impl UserService {
    pub fn new(store: Arc<dyn EventlyStore>, jwt: JwtService) -> Self {
        Self { store, jwt }
    }

    /// Register new user
    pub async fn register(&self, request: RegisterRequest) -> WebResult<UserInfo> {
        let username = request.username.trim();
        if username.is_empty() || request.password.is_empty() {
            debug!("Registration failed: missing credentials");
            return Err(AuthError::MissingCredentials.into());
        }

        if request.password.len() < MIN_PASSWORD_LEN {
            return Err(validation_error!(
                format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
                "password",
                "auth"
            )
            .into());
        }

        let user = self
            .store
            .create_user(NewUser {
                username: username.to_string(),
                password_hash: hash_password(&request.password)?,
                is_admin: false,
            })
            .await?;

        info!(user_id = user.id, "Registered new user: {}", user.username);
        Ok(UserInfo::from(&user))
    }

    /// Authenticate user and issue an access token
    pub async fn login(&self, request: LoginRequest) -> WebResult<LoginResponse> {
        if request.username.is_empty() || request.password.is_empty() {
            return Err(AuthError::MissingCredentials.into());
        }

        let user = self
            .store
            .find_user_by_username(request.username.trim())
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(&request.password, &user.password_hash) {
            warn!("Invalid password for user: {}", user.username);
            return Err(AuthError::InvalidCredentials.into());
        }

        let access_token = self.jwt.generate_token(&user)?;
        debug!("User authenticated: {}", user.username);

        Ok(LoginResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.jwt.expires_in(),
            user: UserInfo::from(&user),
        })
    }

    /// Get user by ID
    pub async fn get_user(&self, user_id: UserId) -> WebResult<UserInfo> {
        let user = self
            .store
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| not_found_error!(format!("user {user_id}"), "auth"))?;

        Ok(UserInfo::from(&user))
    }

    /// Create the configured admin account unless the username is taken
    pub async fn ensure_admin(&self, admin: &BootstrapAdmin) -> WebResult<()> {
        if let Some(existing) = self.store.find_user_by_username(&admin.username).await? {
            if !existing.is_admin {
                warn!(
                    "Bootstrap admin '{}' exists without admin rights; leaving it unchanged",
                    admin.username
                );
            }
            return Ok(());
        }

        let user = self
            .store
            .create_user(NewUser {
                username: admin.username.clone(),
                password_hash: hash_password(&admin.password)?,
                is_admin: true,
            })
            .await?;

        info!(user_id = user.id, "Created bootstrap admin user: {}", user.username);
        Ok(())
    }
}

/// Hash password using Argon2
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            warn!("Failed to hash password: {}", e);
            AuthError::PasswordHash
        })
}

/// Verify password against hash; a malformed hash never matches
fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WebError;
    use evently_core::{AuthConfig, EventlyError, MemoryStore};

    fn service() -> UserService {
        UserService::new(
            Arc::new(MemoryStore::new()),
            JwtService::new(&AuthConfig::default()),
        )
    }

    fn register(username: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_password_hashing() {
        let hash = hash_password("secret123").unwrap();
        assert_ne!(hash, "secret123");
        assert!(verify_password("secret123", &hash));
        assert!(!verify_password("wrong", &hash));
        assert!(!verify_password("secret123", "not-a-phc-string"));
    }

    #[tokio::test]
    async fn test_register_and_login() {
        let users = service();
        let info = users.register(register("alice", "secret123")).await.unwrap();
        assert_eq!(info.username, "alice");
        assert!(!info.is_admin);

        let login = users
            .login(LoginRequest {
                username: "alice".to_string(),
                password: "secret123".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(login.token_type, "Bearer");
        assert_eq!(login.user, info);
        assert!(!login.access_token.is_empty());
    }

    #[tokio::test]
    async fn test_register_rejections() {
        let users = service();

        assert!(matches!(
            users.register(register("", "secret123")).await,
            Err(WebError::Auth(AuthError::MissingCredentials))
        ));
        assert!(matches!(
            users.register(register("bob", "short")).await,
            Err(WebError::Domain(EventlyError::Validation { .. }))
        ));

        users.register(register("bob", "secret123")).await.unwrap();
        assert!(matches!(
            users.register(register("bob", "another1")).await,
            Err(WebError::Domain(EventlyError::Conflict { .. }))
        ));
    }

    #[tokio::test]
    async fn test_login_rejections() {
        let users = service();
        users.register(register("carol", "secret123")).await.unwrap();

        for (username, password) in [("carol", "wrong-password"), ("nobody", "secret123")] {
            let result = users
                .login(LoginRequest {
                    username: username.to_string(),
                    password: password.to_string(),
                })
                .await;
            assert!(matches!(
                result,
                Err(WebError::Auth(AuthError::InvalidCredentials))
            ));
        }
    }

    #[tokio::test]
    async fn test_ensure_admin_is_idempotent() {
        let users = service();
        let admin = BootstrapAdmin {
            username: "root".to_string(),
            password: "root-password".to_string(),
        };

        users.ensure_admin(&admin).await.unwrap();
        users.ensure_admin(&admin).await.unwrap();

        let login = users
            .login(LoginRequest {
                username: "root".to_string(),
                password: "root-password".to_string(),
            })
            .await
            .unwrap();
        assert!(login.user.is_admin);
        assert_eq!(users.get_user(login.user.id).await.unwrap(), login.user);
    }
}
