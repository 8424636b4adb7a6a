//! Core Kernel - Foundational types for the claim processing service
//!
//! This crate provides the building blocks used by the domain and
//! infrastructure crates:
//! - Fixed-point monetary amounts
//! - Claim identifiers
//! - Service date parsing
//! - Port error types shared by storage adapters

pub mod money;
pub mod temporal;
pub mod identifiers;
pub mod ports;
pub mod error;

pub use money::{Amount, AmountError, AMOUNT_SCALE};
pub use temporal::{parse_service_date, TemporalError};
pub use identifiers::{ClaimId, ClaimNumber, InvalidClaimNumber};
pub use ports::{DomainPort, PortError};
pub use error::CoreError;
