//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /health`              - Store connectivity (public)
//! - `/api/expert/*`             - Expert profile and availability
//! - `/api/admin/*`              - Expert management (Bearer token required)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket, stricter on admin routes
//! - **Authentication** - Bearer token on admin routes
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::{auth, rate_limit, tracing};
use crate::state::AppState;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
///
/// Rate limiting keys on the peer address, so the returned service must be
/// served with connect info (see [`crate::server::run`]).
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let admin_router = api::routes::admin_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer))
        .layer(rate_limit::secure_layer());

    let expert_router = api::routes::expert_routes().layer(rate_limit::layer());

    let router = Router::new()
        .route("/health", get(health_handler))
        .nest("/api", expert_router.merge(admin_router))
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}

