//! API error handling

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use core_kernel::PortError;
use domain_claims::{ClaimError, RecordLocator, RecordRejection};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("{message}")]
    Validation {
        message: String,
        details: Vec<ErrorDetail>,
    },

    #[error("Rate limit exceeded, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// One failing field of one record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorDetail {
    pub record: RecordLocator,
    pub field: String,
    pub reason: String,
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ErrorDetail>>,
}

impl ApiError {
    /// Flattens record rejections into per-field details
    pub fn from_rejections(rejections: &[RecordRejection]) -> Self {
        let details: Vec<ErrorDetail> = rejections
            .iter()
            .flat_map(|rejection| {
                rejection.errors.iter().map(move |e| ErrorDetail {
                    record: rejection.record,
                    field: e.field.clone(),
                    reason: e.reason.clone(),
                })
            })
            .collect();

        ApiError::Validation {
            message: format!("{} record(s) failed validation", rejections.len()),
            details,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let retry_after = match &self {
            ApiError::RateLimited { retry_after_secs } => Some(*retry_after_secs),
            _ => None,
        };

        let (status, error_type, message, details) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::Validation { message, details } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                message,
                Some(details),
            ),
            e @ ApiError::RateLimited { .. } => (
                StatusCode::TOO_MANY_REQUESTS,
                "rate_limited",
                e.to_string(),
                None,
            ),
            ApiError::ServiceUnavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "service_unavailable", msg, None)
            }
            ApiError::Storage(msg) => {
                error!(error = %msg, "Storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "storage_error",
                    "Claims could not be stored".to_string(),
                    None,
                )
            }
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message,
            details,
        };

        let mut response = (status, Json(body)).into_response();
        if let Some(secs) = retry_after {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs));
        }
        response
    }
}

impl From<ClaimError> for ApiError {
    fn from(err: ClaimError) -> Self {
        match err {
            ClaimError::MalformedInput(msg) => ApiError::BadRequest(msg),
            ClaimError::Validation(rejections) => ApiError::from_rejections(&rejections),
            e @ ClaimError::InvalidLimit(_) => ApiError::BadRequest(e.to_string()),
            ClaimError::Storage(port) => ApiError::from(port),
        }
    }
}

impl From<PortError> for ApiError {
    fn from(err: PortError) -> Self {
        ApiError::Storage(err.to_string())
    }
}
