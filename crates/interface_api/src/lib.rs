//! HTTP API Layer
//!
//! REST API for dental claim intake and provider ranking using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Claim submission (JSON and CSV), top providers, health
//! - **Middleware**: Request logging and per-client rate limiting of `/` and
//!   `/claims/top-providers`
//! - **DTOs**: Request/Response data transfer objects
//! - **Error Handling**: Consistent error responses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::create_router;
//!
//! let repository: Arc<dyn ClaimRepository> = Arc::new(InMemoryClaimRepository::new());
//! let app = create_router(repository, config);
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod rate_limit;
pub mod handlers;
pub mod dto;
pub mod telemetry;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use domain_claims::{ClaimProcessor, ClaimRepository};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::handlers::{claims, health};
use crate::middleware::{rate_limit_middleware, request_log_middleware, RateLimitState};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub processor: ClaimProcessor,
    pub config: ApiConfig,
}

/// Creates the main API router
///
/// # Arguments
///
/// * `repository` - Claims storage, injected by the caller
/// * `config` - API configuration
///
/// # Returns
///
/// Configured Axum router with all routes and middleware
pub fn create_router(repository: Arc<dyn ClaimRepository>, config: ApiConfig) -> Router {
    let rate_limited = || {
        axum_middleware::from_fn_with_state(
            RateLimitState::new(config.rate_limit_per_minute, config.trust_forwarded_for),
            rate_limit_middleware,
        )
    };

    // Service info and aggregation each get their own per-client budget
    let info_routes = Router::new()
        .route("/", get(health::root))
        .route_layer(rate_limited());

    let ranking_routes = Router::new()
        .route("/top-providers", get(claims::top_providers))
        .route_layer(rate_limited());

    let state = AppState {
        processor: ClaimProcessor::new(repository),
        config,
    };

    // Public routes
    let public_routes = Router::new()
        .merge(info_routes)
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    let claims_routes = Router::new()
        .route("/process", post(claims::process_claims))
        .route("/process-csv", post(claims::process_csv))
        .merge(ranking_routes);

    Router::new()
        .merge(public_routes)
        .nest("/claims", claims_routes)
        .layer(DefaultBodyLimit::max(state.config.max_body_bytes))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                )
                .layer(axum_middleware::from_fn(request_log_middleware)),
        )
        .with_state(state)
}
