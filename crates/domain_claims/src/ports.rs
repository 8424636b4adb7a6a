//! Claims storage port
//!
//! The processor depends on this trait only; adapters live in `infra_db`.
//!
//! ```rust,ignore
//! let repository: Arc<dyn ClaimRepository> = Arc::new(PostgresClaimRepository::new(pool));
//! let processor = ClaimProcessor::new(repository);
//! ```

use async_trait::async_trait;
use core_kernel::{DomainPort, PortError};

use crate::aggregation::{ProviderLimit, ProviderTotal};
use crate::claim::Claim;

#[async_trait]
pub trait ClaimRepository: DomainPort {
    /// Stores a batch of claims atomically: either every claim is stored or none is
    async fn insert_claims(&self, claims: &[Claim]) -> Result<(), PortError>;

    /// Ranks providers by summed net fee, highest first, ties by NPI ascending
    async fn top_providers(&self, limit: ProviderLimit) -> Result<Vec<ProviderTotal>, PortError>;

    /// Number of stored claims
    async fn count_claims(&self) -> Result<u64, PortError>;

    /// Verifies the backing store is reachable
    async fn health_check(&self) -> Result<(), PortError>;
}
