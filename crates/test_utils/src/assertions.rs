//! Custom Test Assertions
//!
//! Assertion helpers for claim types that give more meaningful failure
//! messages than a bare `assert_eq!`.

use core_kernel::Amount;
use domain_claims::aggregation::compare_totals;
use domain_claims::{Claim, ProviderTotal, RecordRejection};

/// Asserts an amount renders as the expected two-decimal string
pub fn assert_amount(actual: Amount, expected: &str) {
    assert_eq!(
        actual.to_string(),
        expected,
        "Amount mismatch: actual={}, expected={}",
        actual,
        expected
    );
}

/// Asserts the stored net fee matches the formula over the source amounts
pub fn assert_net_fee_consistent(claim: &Claim) {
    assert!(
        claim.net_fee_is_consistent(),
        "claim {} has net fee {} inconsistent with its amounts",
        claim.claim_number,
        claim.net_fee
    );
}

/// Asserts a provider ranking is sorted and within the limit
pub fn assert_ranked(totals: &[ProviderTotal], limit: usize) {
    assert!(
        totals.len() <= limit,
        "ranking has {} entries, limit is {}",
        totals.len(),
        limit
    );
    for pair in totals.windows(2) {
        assert_ne!(
            compare_totals(&pair[0], &pair[1]),
            std::cmp::Ordering::Greater,
            "ranking out of order: {:?} before {:?}",
            pair[0],
            pair[1]
        );
    }
}

/// Asserts a rejection names the given field
pub fn assert_rejected_field(rejection: &RecordRejection, field: &str) {
    assert!(
        rejection.errors.iter().any(|e| e.field == field),
        "expected an error on '{}' for record {}, got {:?}",
        field,
        rejection.record,
        rejection.errors
    );
}
