//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! claim processing test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built claim submissions in JSON and CSV form
//! - `builders`: Builder for claim records with sensible defaults
//! - `database`: PostgreSQL test container management
//! - `assertions`: Assertion helpers for amounts and rankings
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod database;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use database::*;
pub use assertions::*;
pub use generators::*;
