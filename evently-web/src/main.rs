//! Evently Web Server
//!
//! Events and RSVPs over HTTP.

use anyhow::Context;
use clap::Parser;
use evently_core::{init_logging, EventlyConfig, LogFormat};
use evently_web::server::EventlyServerBuilder;
use std::path::PathBuf;
use tracing::info;

/// Evently Web Server - events and RSVPs with anonymous, user and admin tiers
#[derive(Parser, Debug)]
#[command(name = "evently-web")]
#[command(about = "HTTP API for events and RSVPs")]
#[command(version)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, env = "EVENTLY_CONFIG")]
    config: Option<PathBuf>,

    /// Server host to bind to
    #[arg(long)]
    host: Option<String>,

    /// Server port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// SQLite URL, or `memory` for a non-persistent store
    #[arg(long)]
    database_url: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,

    /// Log output format (json, pretty, compact)
    #[arg(long)]
    log_format: Option<LogFormat>,

    /// Print the effective configuration and exit
    #[arg(long)]
    print_config: bool,
}

impl Args {
    /// Build the effective configuration: file, then environment, then flags
    fn load_config(&self) -> anyhow::Result<EventlyConfig> {
        let mut config = match &self.config {
            Some(path) => EventlyConfig::from_file(path)
                .with_context(|| format!("Failed to load {}", path.display()))?,
            None => EventlyConfig::default(),
        };

        config.apply_env();

        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(url) = &self.database_url {
            config.database.url = url.clone();
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        if let Some(format) = self.log_format {
            config.logging.format = format;
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let config = args.load_config()?;

    if args.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    init_logging(&config.logging)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!("Database: {}", config.database.url);

    let server = EventlyServerBuilder::new()
        .config(config)
        .build()
        .await
        .context("Failed to build server")?;

    server.start().await?;
    Ok(())
}
