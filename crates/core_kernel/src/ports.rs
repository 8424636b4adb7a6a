//! Ports and Adapters Infrastructure
//!
//! Shared error type and marker trait for the storage ports defined in the
//! domain crates.
//!
//! ```text
//!     ClaimProcessor ──► ClaimRepository (port, domain_claims)
//!                              ▲          ▲
//!                 PostgreSQL adapter   In-memory adapter
//!                        (infra_db)       (infra_db)
//! ```

use std::fmt;
use thiserror::Error;

type Source = Box<dyn std::error::Error + Send + Sync>;

/// Failure reported by a port adapter
///
/// Adapters translate driver errors into this type; the domain never sees
/// `sqlx` or any other storage crate.
#[derive(Debug, Error)]
pub enum PortError {
    #[error("{entity} '{id}' not found")]
    NotFound { entity: String, id: String },

    /// A uniqueness or integrity rule of the store was violated
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The store could not be reached; retrying later may succeed
    #[error("{resource} unavailable: {message}")]
    Unavailable {
        resource: String,
        message: String,
        #[source]
        source: Option<Source>,
    },

    #[error("Storage failure: {message}")]
    Storage {
        message: String,
        #[source]
        source: Option<Source>,
    },
}

impl PortError {
    pub fn not_found(entity: impl Into<String>, id: impl fmt::Display) -> Self {
        PortError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        PortError::Conflict(message.into())
    }

    /// The backing connection failed
    pub fn connection(message: impl Into<String>) -> Self {
        PortError::Unavailable {
            resource: "database".to_string(),
            message: message.into(),
            source: None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        PortError::Storage {
            message: message.into(),
            source: None,
        }
    }

    /// Wraps an underlying error as a storage failure
    pub fn storage<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        PortError::Storage {
            message: error.to_string(),
            source: Some(Box::new(error)),
        }
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, PortError::Unavailable { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, PortError::NotFound { .. })
    }
}

/// Marker trait for all domain ports
///
/// Ports are shared across request handlers as `Arc<dyn Port>`.
pub trait DomainPort: Send + Sync + 'static {}
