//! Health check handlers

use axum::{extract::State, Json};
use serde::Serialize;
use tracing::warn;

use crate::dto::claims::ServiceInfo;
use crate::error::ApiError;
use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Service banner listing the endpoints
pub async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        service: "claim-process",
        version: env!("CARGO_PKG_VERSION"),
        endpoints: vec![
            "POST /claims/process",
            "POST /claims/process-csv",
            "GET /claims/top-providers?limit=N",
            "GET /health",
            "GET /health/ready",
        ],
    })
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness check (includes storage)
pub async fn readiness_check(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, ApiError> {
    state
        .processor
        .repository()
        .health_check()
        .await
        .map_err(|e| {
            warn!(error = %e, "Readiness check failed");
            ApiError::ServiceUnavailable("claims storage".to_string())
        })?;

    Ok(Json(HealthResponse {
        status: "ready".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}
