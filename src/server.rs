//! HTTP server initialization and runtime setup.
//!
//! Handles database connections, cache setup, identity verification, the rate
//! limiter sweep task, and the Axum server lifecycle including graceful shutdown.

use crate::application::services::{AuthService, UserService};
use crate::config::Config;
use crate::domain::identity::TokenVerifier;
use crate::domain::rate_limit_sweeper::spawn_sweeper;
use crate::domain::rate_limiter::RateLimiter;
use crate::domain::repositories::UserRepository;
use crate::infrastructure::cache::{CacheService, NullCache, RedisCache};
use crate::infrastructure::identity::FirebaseVerifier;
use crate::infrastructure::persistence::PgUserRepository;
use crate::routes::app_router;
use crate::state::AppState;
use crate::utils::ClientIpSource;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tower::Layer;
use tower_http::normalize_path::NormalizePathLayer;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool
/// - Apply migrations
/// - Redis cache (or NullCache fallback)
/// - Firebase token verifier
/// - Rate limiter and its sweep task
/// - Axum HTTP server
///
/// On SIGINT/SIGTERM the server stops accepting connections, drains in-flight
/// requests, stops the sweep task (waiting at most `SHUTDOWN_GRACE_SECONDS`)
/// and closes the pool.
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Rate limiter settings are invalid
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = connect_database(&config).await?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database migrations applied");

    let cache = connect_cache(&config).await;

    let verifier: Arc<dyn TokenVerifier> =
        Arc::new(FirebaseVerifier::new(&config.firebase_project_id)?);

    let rate_limiter = Arc::new(RateLimiter::new(
        config.rate_limit_requests,
        config.rate_limit_window(),
    )?);

    let shutdown = CancellationToken::new();
    let sweeper = spawn_sweeper(
        rate_limiter.clone(),
        config.rate_limit_sweep_interval(),
        shutdown.clone(),
    );
    tracing::info!("Rate limiter sweeper started");

    let repository: Arc<dyn UserRepository> =
        Arc::new(PgUserRepository::new(Arc::new(pool.clone())));

    let state = AppState::new(
        Arc::new(UserService::new(repository, cache)),
        Arc::new(AuthService::new(verifier)),
        rate_limiter,
        ClientIpSource::from_behind_proxy(config.behind_proxy),
    );

    let app = NormalizePathLayer::trim_trailing_slash()
        .layer(app_router(state, &config.allow_origins));

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal(shutdown.clone()))
    .await?;

    shutdown.cancel();
    match tokio::time::timeout(config.shutdown_grace(), sweeper).await {
        Ok(Ok(())) => tracing::info!("Rate limiter sweeper stopped"),
        Ok(Err(e)) => tracing::warn!(error = %e, "Rate limiter sweeper failed"),
        Err(_) => tracing::warn!("Rate limiter sweeper did not stop within grace period"),
    }

    pool.close().await;
    tracing::info!("Server stopped");

    Ok(())
}

async fn connect_database(config: &Config) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Some(Duration::from_secs(config.db_idle_timeout)))
        .max_lifetime(Some(Duration::from_secs(config.db_max_lifetime)))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    tracing::info!("Connected to database");
    Ok(pool)
}

async fn connect_cache(config: &Config) -> Arc<dyn CacheService> {
    if let Some(redis_url) = &config.redis_url {
        match RedisCache::connect(redis_url, config.cache_ttl_seconds).await {
            Ok(redis) => {
                tracing::info!("Cache enabled (Redis)");
                Arc::new(redis)
            }
            Err(e) => {
                tracing::warn!("Failed to connect to Redis: {}. Using NullCache.", e);
                Arc::new(NullCache::new())
            }
        }
    } else {
        tracing::info!("Cache disabled (NullCache)");
        Arc::new(NullCache::new())
    }
}

/// Resolves on SIGINT or SIGTERM and cancels `shutdown`.
async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
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
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }

    shutdown.cancel();
}
