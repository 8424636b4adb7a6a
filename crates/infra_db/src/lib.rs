//! Infrastructure Database Layer
//!
//! Storage for processed dental claims. Provides the PostgreSQL connection
//! pool, embedded schema migrations and the adapters behind the
//! `ClaimRepository` port.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool_from_url, run_migrations, PostgresClaimRepository};
//!
//! let pool = create_pool_from_url("postgres://localhost/claims").await?;
//! run_migrations(&pool).await?;
//! let repository = PostgresClaimRepository::new(pool);
//! ```

pub mod pool;
pub mod error;
pub mod repositories;

pub use pool::{create_pool, create_pool_from_url, run_migrations, DatabaseConfig, DatabasePool};
pub use error::DatabaseError;
pub use repositories::{ClaimRow, InMemoryClaimRepository, PostgresClaimRepository};
