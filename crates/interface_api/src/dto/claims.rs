//! Claims DTOs

use chrono::{DateTime, NaiveDate, Utc};
use core_kernel::Amount;
use domain_claims::{BatchMode, Claim, ProviderTotal, RecordRejection};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Query string of the process endpoints
#[derive(Debug, Default, Deserialize)]
pub struct ProcessQuery {
    #[serde(default)]
    pub on_error: BatchMode,
}

/// Query string of the top providers endpoint
#[derive(Debug, Default, Deserialize)]
pub struct TopProvidersQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimResponse {
    pub id: Uuid,
    pub claim_number: String,
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
    pub net_fee: Amount,
    pub created_at: DateTime<Utc>,
}

impl From<Claim> for ClaimResponse {
    fn from(claim: Claim) -> Self {
        Self {
            id: *claim.id.as_uuid(),
            claim_number: claim.claim_number.to_string(),
            service_date: claim.service_date,
            submitted_procedure: claim.submitted_procedure,
            quadrant: claim.quadrant,
            plan_group: claim.plan_group,
            subscriber: claim.subscriber,
            provider_npi: claim.provider_npi,
            provider_fees: claim.provider_fees,
            allowed_fees: claim.allowed_fees,
            member_coinsurance: claim.member_coinsurance,
            member_copay: claim.member_copay,
            net_fee: claim.net_fee,
            created_at: claim.created_at,
        }
    }
}

/// Response of a submission processed with `on_error=skip`
#[derive(Debug, Serialize)]
pub struct ProcessReport {
    pub claims: Vec<ClaimResponse>,
    pub rejected: Vec<RecordRejection>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopProviderResponse {
    pub provider_npi: String,
    pub total_net_fee: Amount,
}

impl From<ProviderTotal> for TopProviderResponse {
    fn from(total: ProviderTotal) -> Self {
        Self {
            provider_npi: total.provider_npi,
            total_net_fee: total.total_net_fee,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub service: &'static str,
    pub version: &'static str,
    pub endpoints: Vec<&'static str>,
}
