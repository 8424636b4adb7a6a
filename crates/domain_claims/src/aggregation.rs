//! Top providers ranking
//!
//! Providers are ranked by the sum of `net_fee` across all of their claims,
//! highest first. Equal totals are ordered by NPI ascending so repeated
//! queries always return the same sequence.

use std::collections::BTreeMap;

use core_kernel::Amount;
use serde::{Deserialize, Serialize};

use crate::claim::Claim;
use crate::error::ClaimError;

/// Upper bound on the number of providers returned by a ranking
pub const MAX_TOP_PROVIDERS: usize = 10;

/// Summed net fee of one provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderTotal {
    pub provider_npi: String,
    pub total_net_fee: Amount,
}

/// Number of providers to return, `1..=MAX_TOP_PROVIDERS`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderLimit(usize);

impl ProviderLimit {
    /// Builds a limit from a caller-supplied value.
    ///
    /// Values above [`MAX_TOP_PROVIDERS`] are clamped; zero is rejected.
    pub fn new(requested: usize) -> Result<Self, ClaimError> {
        if requested == 0 {
            return Err(ClaimError::InvalidLimit(requested));
        }
        Ok(Self(requested.min(MAX_TOP_PROVIDERS)))
    }

    pub fn get(&self) -> usize {
        self.0
    }
}

impl Default for ProviderLimit {
    fn default() -> Self {
        Self(MAX_TOP_PROVIDERS)
    }
}

/// Orders two totals: descending by amount, then ascending by NPI
pub fn compare_totals(a: &ProviderTotal, b: &ProviderTotal) -> std::cmp::Ordering {
    b.total_net_fee
        .cmp(&a.total_net_fee)
        .then_with(|| a.provider_npi.cmp(&b.provider_npi))
}

/// Groups claims by provider, sums their net fees and returns the top `limit`
pub fn rank_providers<'a, I>(claims: I, limit: ProviderLimit) -> Vec<ProviderTotal>
where
    I: IntoIterator<Item = &'a Claim>,
{
    let mut totals: BTreeMap<&str, Amount> = BTreeMap::new();
    for claim in claims {
        let total = totals.entry(claim.provider_npi.as_str()).or_default();
        *total = total.saturating_add(claim.net_fee);
    }

    let mut ranked: Vec<ProviderTotal> = totals
        .into_iter()
        .map(|(npi, total_net_fee)| ProviderTotal {
            provider_npi: npi.to_string(),
            total_net_fee,
        })
        .collect();

    ranked.sort_by(compare_totals);
    ranked.truncate(limit.get());
    ranked
}
