//! Claim entity

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{Amount, ClaimId, ClaimNumber};
use crate::fees::calculate_net_fee;

/// A validated claim that has not yet been assigned identifiers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimDraft {
    pub service_date: NaiveDate,
    pub submitted_procedure: String,
    pub quadrant: Option<String>,
    pub plan_group: Option<String>,
    pub subscriber: Option<String>,
    pub provider_npi: String,
    pub provider_fees: Amount,
    pub allowed_fees: Amount,
    pub member_coinsurance: Amount,
    pub member_copay: Amount,
    /// Net fee computed during validation
    pub net_fee: Amount,
}

/// A processed dental claim
///
/// Claims are immutable once created: `net_fee` is computed from the four
/// source amounts at intake and never recomputed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    /// Unique identifier
    pub id: ClaimId,
    /// Claim number returned to the submitter
    pub claim_number: ClaimNumber,
    /// Date of service
    pub service_date: NaiveDate,
    /// CDT procedure code, always starting with `D`
    pub submitted_procedure: String,
    /// Mouth quadrant, when the procedure is quadrant-specific
    pub quadrant: Option<String>,
    /// Plan/group number
    pub plan_group: Option<String>,
    /// Subscriber number
    pub subscriber: Option<String>,
    /// 10-digit National Provider Identifier
    pub provider_npi: String,
    pub provider_fees: Amount,
    pub allowed_fees: Amount,
    pub member_coinsurance: Amount,
    pub member_copay: Amount,
    /// Derived net fee
    pub net_fee: Amount,
    /// Intake timestamp
    pub created_at: DateTime<Utc>,
}

impl Claim {
    /// Creates a claim from a validated draft, assigning identifiers
    pub fn from_draft(draft: ClaimDraft) -> Self {
        Self {
            id: ClaimId::new(),
            claim_number: ClaimNumber::generate(),
            service_date: draft.service_date,
            submitted_procedure: draft.submitted_procedure,
            quadrant: draft.quadrant,
            plan_group: draft.plan_group,
            subscriber: draft.subscriber,
            provider_npi: draft.provider_npi,
            provider_fees: draft.provider_fees,
            allowed_fees: draft.allowed_fees,
            member_coinsurance: draft.member_coinsurance,
            member_copay: draft.member_copay,
            net_fee: draft.net_fee,
            created_at: Utc::now(),
        }
    }

    /// Checks that the stored net fee matches the source amounts
    pub fn net_fee_is_consistent(&self) -> bool {
        Some(self.net_fee)
            == calculate_net_fee(
                self.provider_fees,
                self.member_coinsurance,
                self.member_copay,
                self.allowed_fees,
            )
    }

    /// Assigns a fresh claim number, keeping every other field
    pub fn renumber(&mut self) {
        self.claim_number = ClaimNumber::generate();
    }
}
