//! Claim Process - API Server Binary
//!
//! This binary starts the HTTP API server for dental claim intake.
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration
//! cargo run --bin claims-api
//!
//! # Run without a database
//! API_STORAGE=memory cargo run --bin claims-api
//! ```
//!
//! # Environment Variables
//!
//! * `API_HOST` - Server host (default: 0.0.0.0)
//! * `API_PORT` - Server port (default: 8080)
//! * `DATABASE_URL` / `API_DATABASE_URL` - PostgreSQL connection string
//! * `API_STORAGE` - `postgres` (default) or `memory`
//! * `API_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)
//! * `API_LOG_FORMAT` - `pretty` (default) or `json`
//! * `API_RATE_LIMIT_PER_MINUTE` - Top providers requests per client per minute (default: 10)
//! * `API_MAX_BODY_BYTES` - Maximum request body size (default: 10 MiB)

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use domain_claims::ClaimRepository;
use infra_db::{create_pool, run_migrations, DatabaseConfig, InMemoryClaimRepository, PostgresClaimRepository};
use interface_api::config::{ApiConfig, StorageBackend};
use interface_api::{create_router, telemetry::init_tracing};
use tokio::net::TcpListener;

/// Main entry point for the API server.
///
/// Initializes logging, loads configuration, opens storage and starts the
/// HTTP server.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = ApiConfig::from_env().context("failed to load configuration")?;

    init_tracing(&config.log_level, config.log_format);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        storage = ?config.storage,
        "Starting claim processing API server"
    );

    let repository = open_repository(&config).await?;

    let app = create_router(repository, config.clone());

    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .with_context(|| format!("invalid server address {}", config.server_addr()))?;

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Builds the configured claims repository, migrating the database first
/// when PostgreSQL is used
async fn open_repository(config: &ApiConfig) -> anyhow::Result<Arc<dyn ClaimRepository>> {
    match config.storage {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; claims are lost on restart");
            Ok(Arc::new(InMemoryClaimRepository::new()))
        }
        StorageBackend::Postgres => {
            let pool = create_pool(DatabaseConfig::new(&config.database_url))
                .await
                .context("failed to connect to database")?;
            run_migrations(&pool).await.context("failed to migrate database")?;
            Ok(Arc::new(PostgresClaimRepository::new(pool)))
        }
    }
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
