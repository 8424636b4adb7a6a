//! Claim validation rules
//!
//! # Rules
//!
//! - `submitted_procedure` is required and must start with an uppercase `D`
//!   (CDT dental procedure codes). Lowercase `d` is rejected.
//! - `provider_npi` is required and must be exactly 10 ASCII digits.
//! - `service_date` is required and must parse as `M/D/YY`, `M/D/YYYY`
//!   or `YYYY-MM-DD`; a trailing time component is ignored.
//! - `provider_fees`, `allowed_fees`, `member_coinsurance` and `member_copay`
//!   default to `0.00` when missing, must parse as amounts, must not be
//!   negative and must not exceed `999999999999.99`.
//! - The resulting `net_fee` must stay within the same bound.
//!
//! All failures of a record are collected so submitters can fix a row in
//! one pass.

use core_kernel::{parse_service_date, Amount};
use serde::Serialize;

use crate::claim::ClaimDraft;
use crate::fees::calculate_net_fee;
use crate::intake::{fields, RawRecord};

/// One failed field check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Normalized name of the offending field
    pub field: String,
    /// Human-readable failure reason
    pub reason: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

/// Returns true when `code` looks like a dental procedure code
pub fn is_dental_procedure_code(code: &str) -> bool {
    code.starts_with('D')
}

/// Returns true when `npi` is a 10-digit National Provider Identifier
pub fn is_valid_npi(npi: &str) -> bool {
    npi.len() == 10 && npi.bytes().all(|b| b.is_ascii_digit())
}

/// Validator for raw claim records
pub struct ClaimValidator;

impl ClaimValidator {
    /// Validates a raw record and normalizes it into a claim draft
    pub fn validate(record: &RawRecord) -> Result<ClaimDraft, Vec<FieldError>> {
        let mut errors = Vec::new();

        let service_date = match record.get(fields::SERVICE_DATE) {
            Some(raw) => match parse_service_date(raw) {
                Ok(date) => Some(date),
                Err(e) => {
                    errors.push(FieldError::new(fields::SERVICE_DATE, e.to_string()));
                    None
                }
            },
            None => {
                errors.push(FieldError::new(fields::SERVICE_DATE, "is required"));
                None
            }
        };

        let submitted_procedure = match record.get(fields::SUBMITTED_PROCEDURE) {
            Some(code) if is_dental_procedure_code(code) => Some(code.to_string()),
            Some(_) => {
                errors.push(FieldError::new(
                    fields::SUBMITTED_PROCEDURE,
                    "must begin with the letter 'D'",
                ));
                None
            }
            None => {
                errors.push(FieldError::new(fields::SUBMITTED_PROCEDURE, "is required"));
                None
            }
        };

        let provider_npi = match record.get(fields::PROVIDER_NPI) {
            Some(npi) if is_valid_npi(npi) => Some(npi.to_string()),
            Some(_) => {
                errors.push(FieldError::new(
                    fields::PROVIDER_NPI,
                    "must be a 10 digit number",
                ));
                None
            }
            None => {
                errors.push(FieldError::new(fields::PROVIDER_NPI, "is required"));
                None
            }
        };

        let provider_fees = Self::amount(record, fields::PROVIDER_FEES, &mut errors);
        let allowed_fees = Self::amount(record, fields::ALLOWED_FEES, &mut errors);
        let member_coinsurance = Self::amount(record, fields::MEMBER_COINSURANCE, &mut errors);
        let member_copay = Self::amount(record, fields::MEMBER_COPAY, &mut errors);

        let net_fee = calculate_net_fee(provider_fees, member_coinsurance, member_copay, allowed_fees)
            .filter(|fee| !fee.exceeds_max());
        if net_fee.is_none() && errors.is_empty() {
            errors.push(FieldError::new(fields::NET_FEE, Self::too_large()));
        }

        match (service_date, submitted_procedure, provider_npi, net_fee) {
            (Some(service_date), Some(submitted_procedure), Some(provider_npi), Some(net_fee))
                if errors.is_empty() =>
            {
                Ok(ClaimDraft {
                    service_date,
                    submitted_procedure,
                    quadrant: record.get(fields::QUADRANT).map(str::to_string),
                    plan_group: record.get(fields::PLAN_GROUP).map(str::to_string),
                    subscriber: record.get(fields::SUBSCRIBER).map(str::to_string),
                    provider_npi,
                    provider_fees,
                    allowed_fees,
                    member_coinsurance,
                    member_copay,
                    net_fee,
                })
            }
            _ => Err(errors),
        }
    }

    fn too_large() -> String {
        format!("must not exceed {}", Amount::max_value())
    }

    /// Parses one monetary field, defaulting to zero when absent
    fn amount(record: &RawRecord, field: &str, errors: &mut Vec<FieldError>) -> Amount {
        let Some(raw) = record.get(field) else {
            return Amount::zero();
        };

        match Amount::parse(raw) {
            Ok(amount) if amount.is_negative() => {
                errors.push(FieldError::new(field, "must not be negative"));
                Amount::zero()
            }
            Ok(amount) if amount.exceeds_max() => {
                errors.push(FieldError::new(field, Self::too_large()));
                Amount::zero()
            }
            Ok(amount) => amount,
            Err(e) => {
                errors.push(FieldError::new(field, e.to_string()));
                Amount::zero()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_procedure_code_rule() {
        assert!(is_dental_procedure_code("D1234"));
        assert!(!is_dental_procedure_code("X1234"));
        assert!(!is_dental_procedure_code("d1234"));
        assert!(!is_dental_procedure_code(""));
    }

    #[test]
    fn test_npi_rule() {
        assert!(is_valid_npi("1234567890"));
        assert!(!is_valid_npi("12345"));
        assert!(!is_valid_npi("12345678901"));
        assert!(!is_valid_npi("12345abcde"));
        assert!(!is_valid_npi("١٢٣٤٥٦٧٨٩٠"));
    }
}
