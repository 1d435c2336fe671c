//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /health`   - Health check: database and cache (public)
//! - `/api/v1/*`      - REST API (public, authenticated, and admin groups)
//!
//! # Middleware
//!
//! Applied to every request, outermost first:
//!
//! 1. **Recovery** - Panics become `500 {"error": "Internal server error: ..."}`
//! 2. **Tracing** - Structured request/response logging
//! 3. **CORS** - Preflight requests are answered here, before rate limiting
//! 4. **Rate limiting** - Fixed window per client
//!
//! Authentication runs last, per route group, just before the handler.

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::{cors, rate_limit, recovery, tracing};
use crate::state::AppState;
use axum::routing::get;
use axum::{Router, middleware};

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `allow_origins` - CORS origins; `*` mirrors any origin
pub fn app_router(state: AppState, allow_origins: &[String]) -> Router {
    api_router(state.clone())
        .route("/health", get(health_handler))
        .with_state(state.clone())
        .layer(middleware::from_fn_with_state(state, rate_limit::layer))
        .layer(cors::layer(allow_origins))
        .layer(tracing::layer())
        .layer(recovery::layer())
}

fn api_router(state: AppState) -> Router<AppState> {
    let v1 = Router::new()
        .merge(api::routes::public_routes(state.clone()))
        .merge(api::routes::protected_routes(state.clone()))
        .merge(api::routes::admin_routes(state));

    Router::new().nest("/api/v1", v1)
}
