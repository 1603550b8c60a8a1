//! HTTP server initialization and runtime setup.
//!
//! Builds the storage backend, wires services and runs the Axum server until
//! Ctrl-C.

use crate::config::{Config, StorageBackend};
use crate::domain::repositories::{ExpertRepository, TokenRepository};
use crate::domain::slot::SlotPolicy;
use crate::infrastructure::persistence::{
    InMemoryExpertRepository, InMemoryTokenRepository, PgExpertRepository, PgTokenRepository,
};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Name under which `ADMIN_BOOTSTRAP_TOKEN` is registered.
const BOOTSTRAP_TOKEN_NAME: &str = "bootstrap";

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool and migrations, or in-memory repositories
/// - Bootstrap admin token (if configured)
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let (expert_repository, token_repository) = build_repositories(&config).await?;

    let state = AppState::new(
        expert_repository,
        token_repository,
        SlotPolicy::from_minutes(config.slot_min_separation_minutes),
        config.reservation_max_attempts,
        config.token_signing_secret.clone(),
    );

    if let Some(token) = &config.admin_bootstrap_token {
        match state
            .auth_service
            .ensure_token(BOOTSTRAP_TOKEN_NAME, token)
            .await
        {
            Ok(Some(_)) => tracing::info!("Bootstrap admin token registered"),
            Ok(None) => tracing::info!("Bootstrap admin token already present"),
            Err(e) => tracing::warn!(error = %e, "Failed to register bootstrap admin token"),
        }
    }

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn build_repositories(
    config: &Config,
) -> Result<(Arc<dyn ExpertRepository>, Arc<dyn TokenRepository>)> {
    match config.storage_backend {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on restart");
            Ok((
                Arc::new(InMemoryExpertRepository::new()),
                Arc::new(InMemoryTokenRepository::new()),
            ))
        }
        StorageBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL is required for the postgres backend")?;

            let pool = PgPoolOptions::new()
                .max_connections(config.db_max_connections)
                .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
                .idle_timeout(Duration::from_secs(config.db_idle_timeout))
                .max_lifetime(Duration::from_secs(config.db_max_lifetime))
                .connect(database_url)
                .await
                .context("Failed to connect to database")?;
            tracing::info!("Connected to database");

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to run migrations")?;
            tracing::info!("Migrations applied");

            let pool = Arc::new(pool);
            Ok((
                Arc::new(PgExpertRepository::new(pool.clone())),
                Arc::new(PgTokenRepository::new(pool)),
            ))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
