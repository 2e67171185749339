//! Cliniq Server
//!
//! HTTP server for the clinic appointment booking backend: multi-role
//! authentication with OTP verification, dual-token sessions, and
//! scheduling CRUD over PostgreSQL.
//!
//! # Usage
//!
//! ```bash
//! # Start with default settings
//! cliniq-server
//!
//! # Start with a config file
//! cliniq-server --config /path/to/config.toml
//!
//! # Start with environment overrides
//! CLINIQ__SERVER__PORT=8080 cliniq-server
//! ```
//!
//! Token secrets come from `ACCESS_TOKEN_KEY` and `REFRESH_TOKEN_KEY`; OTP
//! mail delivery is enabled when `SMTP_HOST`, `SMTP_USER`, `SMTP_PASSWORD`
//! and `SMTP_FROM` are all set, otherwise codes are logged.

mod config;

use std::sync::Arc;

use clap::Parser;
use tokio::signal;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cliniq_api::{create_router, ApiConfig, AppState};
use cliniq_auth::{AuthConfig, AuthService, LogNotifier, OtpNotifier, SmtpConfig, SmtpNotifier};
use cliniq_db::{Database, DatabaseConfig as DbConfig};

use crate::config::ServerConfig;

/// Cliniq Server - clinic appointment booking backend
#[derive(Parser, Debug)]
#[command(name = "cliniq-server")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (TOML, JSON, or YAML)
    #[arg(short, long, env = "CLINIQ_CONFIG")]
    config: Option<String>,

    /// Host to bind to
    #[arg(long, env = "CLINIQ_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "CLINIQ_PORT")]
    port: Option<u16>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "CLINIQ_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Log format (json, pretty)
    #[arg(long, env = "CLINIQ_LOG_FORMAT", default_value = "pretty")]
    log_format: String,

    /// PostgreSQL connection URL
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut server_config = ServerConfig::load(args.config.as_deref())?;

    if let Some(host) = args.host {
        server_config.server.host = host;
    }
    if let Some(port) = args.port {
        server_config.server.port = port;
    }
    if let Some(db_url) = args.database_url {
        server_config.database.postgres_url = db_url;
    }
    server_config.logging.level = args.log_level;
    server_config.logging.format = args.log_format;

    init_logging(&server_config.logging)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting Cliniq");

    // Token secrets and lifetimes come from the environment.
    let auth_config = AuthConfig::from_env();
    if let Err(errors) = auth_config.validate() {
        anyhow::bail!("Invalid auth configuration: {}", errors.join("; "));
    }

    let db = init_database(&server_config.database).await?;
    let auth = init_auth(&auth_config)?;

    let state = Arc::new(AppState::new(db.stores(), auth));

    let api_config = ApiConfig {
        enable_cors: server_config.api.enable_cors,
        cors_origins: server_config.api.cors_origins.clone(),
        enable_compression: server_config.api.enable_compression,
        enable_tracing: server_config.api.enable_tracing,
    };

    let app = create_router(state, api_config);

    let addr = server_config.server.socket_addr()?;

    tracing::info!(
        host = %server_config.server.host,
        port = %server_config.server.port,
        "Server listening"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

/// Initialize tracing/logging
fn init_logging(config: &config::LoggingConfig) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let subscriber = tracing_subscriber::registry().with(env_filter);

    match config.format.as_str() {
        "json" => {
            subscriber.with(fmt::layer().json().with_target(true)).init();
        }
        _ => {
            subscriber
                .with(fmt::layer().pretty().with_target(true))
                .init();
        }
    }

    Ok(())
}

/// Initialize database connection and run migrations
async fn init_database(config: &config::DatabaseSettings) -> anyhow::Result<Database> {
    tracing::info!("Connecting to database...");

    let db_config = DbConfig {
        postgres_url: config.postgres_url.clone(),
        pg_max_connections: config.max_connections,
        pg_min_connections: config.min_connections,
        pg_acquire_timeout_secs: config.connect_timeout_secs,
    };

    let db = Database::connect(&db_config).await?;

    if !db.health_check().await? {
        anyhow::bail!("Database health check failed");
    }

    if config.run_migrations {
        db.migrate().await?;
    }

    tracing::info!("Database ready");

    Ok(db)
}

/// Initialize the authentication service with the configured OTP channel
fn init_auth(config: &AuthConfig) -> anyhow::Result<AuthService> {
    let notifier: Arc<dyn OtpNotifier> = match SmtpConfig::from_env() {
        Some(smtp) => {
            tracing::info!(host = %smtp.host, "OTP delivery via SMTP relay");
            Arc::new(SmtpNotifier::new(&smtp)?)
        }
        None => {
            tracing::warn!("SMTP not configured, OTP codes will be logged");
            Arc::new(LogNotifier)
        }
    };

    Ok(AuthService::new(config, notifier))
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if signal::ctrl_c().await.is_err() {
            tracing::error!("Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(_) => {
                tracing::error!("Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let args = Args::parse_from(["cliniq-server", "--port", "8080"]);
        assert_eq!(args.port, Some(8080));
    }

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.logging.format, "pretty");
    }
}
