//! Application state shared by all handlers

use crate::{
    auth::{jwt::JwtService, users::UserService},
    database::SqliteStore,
    WebResult,
};
use evently_core::{EventlyConfig, EventlyStore, MemoryStore, RsvpService};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    /// Effective configuration
    pub config: Arc<EventlyConfig>,
    /// Event, RSVP and user persistence
    pub store: Arc<dyn EventlyStore>,
    /// RSVP admission and bookkeeping
    pub rsvp_service: RsvpService,
    /// Registration and login
    pub user_service: UserService,
    /// Token issuance and verification
    pub jwt: JwtService,
}

impl AppState {
    /// Create a new application state, connecting to the configured store
    pub async fn new(config: EventlyConfig) -> WebResult<Self> {
        let store: Arc<dyn EventlyStore> = if config.database.is_memory_store() {
            info!("Using in-memory store; data will not survive a restart");
            Arc::new(MemoryStore::new())
        } else {
            Arc::new(SqliteStore::connect(&config.database).await?)
        };

        Self::with_store(config, store).await
    }

    /// Create application state on top of an existing store
    pub async fn with_store(config: EventlyConfig, store: Arc<dyn EventlyStore>) -> WebResult<Self> {
        let jwt = JwtService::new(&config.auth);
        let user_service = UserService::new(store.clone(), jwt.clone());

        if let Some(admin) = &config.auth.bootstrap_admin {
            user_service.ensure_admin(admin).await?;
        }

        let state = Self {
            rsvp_service: RsvpService::new(store.clone()),
            config: Arc::new(config),
            store,
            user_service,
            jwt,
        };

        info!("Application state initialized successfully");
        Ok(state)
    }
}
