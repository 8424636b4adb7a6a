//! Net fee computation

use core_kernel::Amount;

/// Computes the net fee of a claim:
///
/// ```text
/// net_fee = provider_fees + member_coinsurance + member_copay - allowed_fees
/// ```
///
/// Inputs are already normalized to two decimal places, so the result is
/// exact; it may be negative when the allowed amount exceeds what was billed.
/// Returns `None` when the arithmetic overflows.
pub fn calculate_net_fee(
    provider_fees: Amount,
    member_coinsurance: Amount,
    member_copay: Amount,
    allowed_fees: Amount,
) -> Option<Amount> {
    provider_fees
        .checked_add(member_coinsurance)?
        .checked_add(member_copay)?
        .checked_sub(allowed_fees)
}
