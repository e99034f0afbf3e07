//! Configuration management

use crate::error::{ErrorContext, EventlyError, EventlyResult};
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level service configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventlyConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Maximum accepted request body in bytes
    pub body_limit_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            body_limit_bytes: 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite URL, or `memory` for the non-persistent in-process store
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://evently.db".to_string(),
            max_connections: 5,
        }
    }
}

impl DatabaseConfig {
    pub fn is_memory_store(&self) -> bool {
        self.url == "memory"
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_minutes: i64,
    /// Admin account created at startup when the username is free
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "evently-default-secret-change-in-production".to_string(),
            token_ttl_minutes: 60,
            bootstrap_admin: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BootstrapAdmin {
    pub username: String,
    pub password: String,
}

impl EventlyConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> EventlyResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| EventlyError::Config {
            message: format!("Failed to read config file: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("read_file")
                .with_suggestion("Check if the config file exists and is readable"),
        })?;

        let config: EventlyConfig = toml::from_str(&content).map_err(|e| EventlyError::Config {
            message: format!("Failed to parse config: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("parse_toml")
                .with_suggestion("Check TOML syntax in config file"),
        })?;

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> EventlyResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| EventlyError::Config {
            message: format!("Failed to serialize config: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config").with_operation("serialize_toml"),
        })?;

        std::fs::write(path, content).map_err(|e| EventlyError::Config {
            message: format!("Failed to write config file: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("write_file")
                .with_suggestion("Check if the directory exists and is writable"),
        })?;

        Ok(())
    }

    /// Apply environment variable overrides
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    fn apply_env_from(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(host) = var("EVENTLY_HOST") {
            self.server.host = host;
        }
        if let Some(port) = var("EVENTLY_PORT").and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }
        if let Some(url) = var("DATABASE_URL") {
            self.database.url = url;
        }
        if let Some(secret) = var("JWT_SECRET") {
            self.auth.jwt_secret = secret;
        }
        if let (Some(username), Some(password)) =
            (var("EVENTLY_ADMIN_USERNAME"), var("EVENTLY_ADMIN_PASSWORD"))
        {
            self.auth.bootstrap_admin = Some(BootstrapAdmin { username, password });
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> EventlyResult<()> {
        if self.auth.jwt_secret.trim().is_empty() {
            return Err(EventlyError::Config {
                message: "JWT secret must not be empty".to_string(),
                source: None,
                context: ErrorContext::new("config")
                    .with_operation("validate")
                    .with_suggestion("Set auth.jwt_secret or the JWT_SECRET environment variable"),
            });
        }

        if self.auth.token_ttl_minutes <= 0 {
            return Err(EventlyError::Config {
                message: "Token lifetime must be greater than 0".to_string(),
                source: None,
                context: ErrorContext::new("config")
                    .with_operation("validate")
                    .with_suggestion("Set auth.token_ttl_minutes to a positive value"),
            });
        }

        if self.database.max_connections == 0 {
            return Err(EventlyError::Config {
                message: "Database max_connections must be greater than 0".to_string(),
                source: None,
                context: ErrorContext::new("config")
                    .with_operation("validate")
                    .with_suggestion("Set database.max_connections to a positive value"),
            });
        }

        if let Some(admin) = &self.auth.bootstrap_admin {
            if admin.username.is_empty() || admin.password.is_empty() {
                return Err(EventlyError::Config {
                    message: "Bootstrap admin needs both a username and a password".to_string(),
                    source: None,
                    context: ErrorContext::new("config").with_operation("validate"),
                });
            }
        }

        Ok(())
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
