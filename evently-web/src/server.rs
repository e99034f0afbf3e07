//! Evently Web Server
//!
//! Main web server implementation using Axum.

use crate::{create_app, AppState, WebError, WebResult};
use axum::serve;
use evently_core::EventlyConfig;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

/// Main Evently web server
pub struct EventlyServer {
    config: EventlyConfig,
    state: AppState,
}

impl EventlyServer {
    /// Create a new server, connecting to the configured store
    pub async fn new(config: EventlyConfig) -> WebResult<Self> {
        let state = AppState::new(config.clone()).await?;

        Ok(Self { config, state })
    }

    /// Bind the configured address and serve until Ctrl-C
    pub async fn start(self) -> WebResult<()> {
        let address = self.config.address();

        info!("Starting Evently Web Server");
        info!("Server address: http://{}", address);

        let listener = TcpListener::bind(&address)
            .await
            .map_err(WebError::Server)?;

        self.serve(listener).await
    }

    /// Serve on an already bound listener
    pub async fn serve(self, listener: TcpListener) -> WebResult<()> {
        let app = create_app(self.state);

        if let Ok(address) = listener.local_addr() {
            info!("Server listening on http://{}", address);
        }

        if let Err(e) = serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
        {
            error!("Server error: {}", e);
            return Err(WebError::Server(e));
        }

        info!("Server shut down gracefully");
        Ok(())
    }

    /// Get server configuration
    pub fn config(&self) -> &EventlyConfig {
        &self.config
    }

    /// Get application state
    pub fn state(&self) -> &AppState {
        &self.state
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Builder for EventlyServer
pub struct EventlyServerBuilder {
    config: EventlyConfig,
}

impl EventlyServerBuilder {
    /// Create a new server builder
    pub fn new() -> Self {
        Self {
            config: EventlyConfig::default(),
        }
    }

    /// Start from an existing configuration
    pub fn config(mut self, config: EventlyConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the server host
    pub fn host<S: Into<String>>(mut self, host: S) -> Self {
        self.config.server.host = host.into();
        self
    }

    /// Set the server port
    pub fn port(mut self, port: u16) -> Self {
        self.config.server.port = port;
        self
    }

    /// Set database URL
    pub fn database_url<S: Into<String>>(mut self, database_url: S) -> Self {
        self.config.database.url = database_url.into();
        self
    }

    /// Build the server
    pub async fn build(self) -> WebResult<EventlyServer> {
        EventlyServer::new(self.config).await
    }
}

impl Default for EventlyServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
