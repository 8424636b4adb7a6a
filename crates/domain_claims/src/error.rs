//! Claims domain errors

use core_kernel::PortError;
use thiserror::Error;

use crate::service::RecordRejection;

/// Errors that can occur in the claims domain
#[derive(Debug, Error)]
pub enum ClaimError {
    /// The submission as a whole could not be read
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// One or more records failed validation; nothing was stored
    #[error("{} record(s) failed validation", .0.len())]
    Validation(Vec<RecordRejection>),

    #[error("Invalid provider limit {0}: must be at least 1")]
    InvalidLimit(usize),

    #[error("Storage error: {0}")]
    Storage(#[from] PortError),
}

impl ClaimError {
    pub fn malformed(message: impl Into<String>) -> Self {
        ClaimError::MalformedInput(message.into())
    }
}
