//! API middleware

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{HeaderMap, HeaderValue, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use tracing::{info, warn};

use crate::error::ApiError;
use crate::rate_limit::{RateDecision, RateLimiter};

const FORWARDED_FOR: &str = "x-forwarded-for";
const REQUEST_ID: &str = "x-request-id";
const RATE_LIMIT_REMAINING: &str = "x-ratelimit-remaining";

/// Identifies the caller by peer IP, else `"unknown"`.
///
/// The first `X-Forwarded-For` entry is used instead only when
/// `trust_forwarded_for` is set, i.e. when a proxy in front of the service
/// overwrites that header.
pub fn client_key(headers: &HeaderMap, peer: Option<SocketAddr>, trust_forwarded_for: bool) -> String {
    let forwarded = trust_forwarded_for
        .then(|| forwarded_for(headers))
        .flatten();

    forwarded
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}

fn forwarded_for(headers: &HeaderMap) -> Option<String> {
    headers
        .get(FORWARDED_FOR)
        .and_then(|h| h.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|first| !first.is_empty())
        .map(str::to_string)
}

fn peer_addr(request: &Request<Body>) -> Option<SocketAddr> {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0)
}

/// Limiter and client keying shared by one group of rate limited routes
#[derive(Clone)]
pub struct RateLimitState {
    pub limiter: Arc<RateLimiter>,
    pub trust_forwarded_for: bool,
}

impl RateLimitState {
    pub fn new(per_minute: u32, trust_forwarded_for: bool) -> Self {
        Self {
            limiter: Arc::new(RateLimiter::per_minute(per_minute)),
            trust_forwarded_for,
        }
    }
}

/// Request logging middleware
///
/// Logs every request with its client, status and duration
pub async fn request_log_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let client = client_key(request.headers(), peer_addr(&request), false);
    let forwarded_for = forwarded_for(request.headers()).unwrap_or_else(|| "-".to_string());
    let request_id = request
        .headers()
        .get(REQUEST_ID)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("-")
        .to_string();

    let start = Utc::now();

    let response = next.run(request).await;

    let duration = Utc::now() - start;
    let status = response.status();

    info!(
        method = %method,
        uri = %uri,
        client = %client,
        forwarded_for = %forwarded_for,
        request_id = %request_id,
        status = %status.as_u16(),
        duration_ms = duration.num_milliseconds(),
        "API request"
    );

    response
}

/// Rate limiting middleware
///
/// Spends one token from the caller's bucket; an empty bucket answers 429
pub async fn rate_limit_middleware(
    State(state): State<RateLimitState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let client = client_key(request.headers(), peer_addr(&request), state.trust_forwarded_for);

    match state.limiter.check(&client) {
        RateDecision::Allowed { remaining } => {
            let mut response = next.run(request).await;
            response
                .headers_mut()
                .insert(RATE_LIMIT_REMAINING, HeaderValue::from(remaining));
            response
        }
        RateDecision::Limited { retry_after } => {
            let retry_after_secs = retry_after.as_secs_f64().ceil().max(1.0) as u64;
            warn!(client = %client, retry_after_secs, "Rate limit exceeded");
            ApiError::RateLimited { retry_after_secs }.into_response()
        }
    }
}
