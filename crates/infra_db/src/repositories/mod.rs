//! Claim repository adapters
//!
//! Both adapters implement `domain_claims::ClaimRepository`; the API picks one
//! at startup and injects it as `Arc<dyn ClaimRepository>`.

pub mod claims;
pub mod memory;

pub use claims::{ClaimRow, PostgresClaimRepository};
pub use memory::InMemoryClaimRepository;
