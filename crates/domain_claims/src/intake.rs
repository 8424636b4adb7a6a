//! Raw claim records
//!
//! Claims arrive as JSON objects or CSV rows whose column names vary in
//! spelling and capitalization (`"Provider NPI"`, `"provider_npi"`,
//! `"Plan/Group #"`). Every key is normalized to snake_case before the
//! validator looks at it, so both sources share one vocabulary.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::error::ClaimError;
use crate::validation::FieldError;

/// Normalized field names understood by the validator
pub mod fields {
    pub const SERVICE_DATE: &str = "service_date";
    pub const SUBMITTED_PROCEDURE: &str = "submitted_procedure";
    pub const QUADRANT: &str = "quadrant";
    pub const PLAN_GROUP: &str = "plan_group";
    pub const SUBSCRIBER: &str = "subscriber";
    pub const PROVIDER_NPI: &str = "provider_npi";
    pub const PROVIDER_FEES: &str = "provider_fees";
    pub const ALLOWED_FEES: &str = "allowed_fees";
    pub const MEMBER_COINSURANCE: &str = "member_coinsurance";
    pub const MEMBER_COPAY: &str = "member_copay";
    pub const NET_FEE: &str = "net_fee";

    /// Pseudo-field used when the record itself is unusable
    pub const RECORD: &str = "record";
}

/// Normalizes a column or JSON key: lowercase, with every run of
/// non-alphanumeric characters collapsed into a single `_`.
///
/// ```rust
/// use domain_claims::intake::normalize_key;
///
/// assert_eq!(normalize_key(" Provider NPI"), "provider_npi");
/// assert_eq!(normalize_key("Plan/Group #"), "plan_group");
/// assert_eq!(normalize_key("Subscriber#"), "subscriber");
/// ```
pub fn normalize_key(key: &str) -> String {
    let mut normalized = String::with_capacity(key.len());
    let mut pending_separator = false;

    for c in key.trim().chars() {
        if c.is_alphanumeric() {
            if pending_separator && !normalized.is_empty() {
                normalized.push('_');
            }
            pending_separator = false;
            normalized.extend(c.to_lowercase());
        } else {
            pending_separator = true;
        }
    }

    normalized
}

/// A claim record before validation: normalized key to raw text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    values: BTreeMap<String, String>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a record from `(key, value)` pairs, normalizing every key.
    ///
    /// When two keys normalize to the same name the later one wins.
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut record = Self::new();
        for (key, value) in pairs {
            record.insert(key.as_ref(), value);
        }
        record
    }

    /// Builds a record from one JSON value.
    ///
    /// Strings are taken verbatim and numbers use their textual form. `null`
    /// leaves the field absent. Any other value type is a field error.
    pub fn from_json(value: &Value) -> Result<Self, Vec<FieldError>> {
        let object = value.as_object().ok_or_else(|| {
            vec![FieldError::new(fields::RECORD, "expected a JSON object")]
        })?;

        let mut record = Self::new();
        let mut errors = Vec::new();

        for (key, value) in object {
            match value {
                Value::String(s) => record.insert(key, s.as_str()),
                Value::Number(n) => record.insert(key, n.to_string()),
                Value::Null => {}
                _ => errors.push(FieldError::new(
                    normalize_key(key),
                    "must be a string or a number",
                )),
            }
        }

        if errors.is_empty() {
            Ok(record)
        } else {
            Err(errors)
        }
    }

    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(normalize_key(key), value.into());
    }

    /// Returns the trimmed value of a field, treating blank text as absent
    pub fn get(&self, field: &str) -> Option<&str> {
        self.values
            .get(field)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Where a record came from within its submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordLocator {
    /// Zero-based position in a JSON submission
    Index(usize),
    /// One-based line in a CSV file (the header is line 1)
    Line(u64),
}

impl std::fmt::Display for RecordLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordLocator::Index(i) => write!(f, "record {}", i),
            RecordLocator::Line(l) => write!(f, "line {}", l),
        }
    }
}

/// One record of a submission, either readable or already failed
#[derive(Debug, Clone)]
pub struct IntakeRecord {
    pub locator: RecordLocator,
    pub parsed: Result<RawRecord, Vec<FieldError>>,
}

/// Splits a JSON submission into records.
///
/// Accepts a single claim object, an array of claim objects, or an object
/// wrapping the array under `"claims"`.
pub fn parse_json_submission(body: &[u8]) -> Result<Vec<IntakeRecord>, ClaimError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| ClaimError::malformed(format!("invalid JSON: {}", e)))?;

    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut object) => match object.remove("claims") {
            Some(Value::Array(items)) => items,
            Some(_) => return Err(ClaimError::malformed("'claims' must be an array")),
            None => vec![Value::Object(object)],
        },
        _ => {
            return Err(ClaimError::malformed(
                "expected a claim object or an array of claims",
            ))
        }
    };

    Ok(items
        .iter()
        .enumerate()
        .map(|(index, item)| IntakeRecord {
            locator: RecordLocator::Index(index),
            parsed: RawRecord::from_json(item),
        })
        .collect())
}
