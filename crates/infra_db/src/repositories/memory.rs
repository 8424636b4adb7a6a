//! In-memory claims repository
//!
//! Process-local adapter backed by a `RwLock<Vec<Claim>>`. Used by the API
//! when `API_STORAGE=memory` and throughout the HTTP test suite.

use std::collections::HashSet;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use core_kernel::{ClaimNumber, DomainPort, PortError};
use domain_claims::aggregation::rank_providers;
use domain_claims::{Claim, ClaimRepository, ProviderLimit, ProviderTotal};

#[derive(Debug, Default)]
pub struct InMemoryClaimRepository {
    claims: RwLock<Vec<Claim>>,
}

impl InMemoryClaimRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every stored claim in insertion order
    pub async fn all(&self) -> Vec<Claim> {
        self.claims.read().await.clone()
    }
}

impl DomainPort for InMemoryClaimRepository {}

#[async_trait]
impl ClaimRepository for InMemoryClaimRepository {
    async fn insert_claims(&self, claims: &[Claim]) -> Result<(), PortError> {
        let mut stored = self.claims.write().await;

        // Claim numbers are unique; reject the whole batch on any collision
        let mut seen: HashSet<&ClaimNumber> = stored.iter().map(|c| &c.claim_number).collect();
        for claim in claims {
            if !seen.insert(&claim.claim_number) {
                return Err(PortError::conflict(format!(
                    "claim number {} already exists",
                    claim.claim_number
                )));
            }
        }
        drop(seen);

        stored.extend_from_slice(claims);
        debug!(count = claims.len(), total = stored.len(), "Claims stored in memory");
        Ok(())
    }

    async fn top_providers(&self, limit: ProviderLimit) -> Result<Vec<ProviderTotal>, PortError> {
        let stored = self.claims.read().await;
        Ok(rank_providers(stored.iter(), limit))
    }

    async fn count_claims(&self) -> Result<u64, PortError> {
        Ok(self.claims.read().await.len() as u64)
    }

    async fn health_check(&self) -> Result<(), PortError> {
        Ok(())
    }
}
