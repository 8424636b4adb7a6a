//! Dental Claims Domain
//!
//! This crate implements claim intake from first contact to storage:
//!
//! ```text
//! JSON / CSV -> RawRecord -> ClaimValidator -> ClaimDraft -> Claim (net_fee) -> ClaimRepository
//! ```
//!
//! and the provider ranking served from stored claims.

pub mod claim;
pub mod intake;
pub mod validation;
pub mod fees;
pub mod aggregation;
pub mod csv_import;
pub mod ports;
pub mod service;
pub mod error;

pub use claim::{Claim, ClaimDraft};
pub use intake::{IntakeRecord, RawRecord, RecordLocator};
pub use validation::{ClaimValidator, FieldError};
pub use fees::calculate_net_fee;
pub use aggregation::{ProviderLimit, ProviderTotal, MAX_TOP_PROVIDERS};
pub use ports::ClaimRepository;
pub use service::{BatchMode, ClaimProcessor, ProcessOutcome, RecordRejection};
pub use error::ClaimError;
