//! Core error types used across the system

use thiserror::Error;

/// Errors raised while the service is being set up
///
/// Per-field failures are reported by the domain crates; this type covers
/// what has to stop the process before it serves anything.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl CoreError {
    pub fn configuration(message: impl Into<String>) -> Self {
        CoreError::Configuration(message.into())
    }
}
