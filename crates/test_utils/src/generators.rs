//! Property-Based Test Generators
//!
//! Proptest strategies for claim intake data.

use core_kernel::Amount;
use proptest::prelude::*;

use crate::builders::ClaimRecordBuilder;

/// Non-negative amounts up to one million, in cents
pub fn amount_cents_strategy() -> impl Strategy<Value = i64> {
    0i64..100_000_000i64
}

pub fn amount_strategy() -> impl Strategy<Value = Amount> {
    amount_cents_strategy().prop_map(Amount::from_cents)
}

/// Exactly ten ASCII digits
pub fn npi_strategy() -> impl Strategy<Value = String> {
    "[0-9]{10}"
}

/// Small NPI pool so generated batches share providers
pub fn pooled_npi_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "1000000001".to_string(),
        "1000000002".to_string(),
        "1000000003".to_string(),
        "1000000004".to_string(),
        "1000000005".to_string(),
    ])
}

/// CDT-style procedure codes
pub fn procedure_code_strategy() -> impl Strategy<Value = String> {
    "D[0-9]{4}"
}

/// Valid claim records with arbitrary amounts
pub fn claim_record_strategy() -> impl Strategy<Value = ClaimRecordBuilder> {
    (
        procedure_code_strategy(),
        pooled_npi_strategy(),
        amount_strategy(),
        amount_strategy(),
        amount_strategy(),
        amount_strategy(),
    )
        .prop_map(|(procedure, npi, provider, allowed, coinsurance, copay)| {
            ClaimRecordBuilder::new()
                .procedure(&procedure)
                .npi(&npi)
                .fees(
                    &provider.to_string(),
                    &allowed.to_string(),
                    &coinsurance.to_string(),
                    &copay.to_string(),
                )
        })
}
