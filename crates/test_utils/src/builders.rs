//! Test Data Builders
//!
//! `ClaimRecordBuilder` starts from a valid claim and lets tests override only
//! the fields they care about. The same record can be rendered as a
//! `RawRecord`, a JSON object or a CSV row.

use domain_claims::intake::fields;
use domain_claims::{Claim, ClaimValidator, RawRecord};

use crate::fixtures::NpiFixtures;

const COLUMNS: [&str; 10] = [
    fields::SERVICE_DATE,
    fields::SUBMITTED_PROCEDURE,
    fields::QUADRANT,
    fields::PLAN_GROUP,
    fields::SUBSCRIBER,
    fields::PROVIDER_NPI,
    fields::PROVIDER_FEES,
    fields::ALLOWED_FEES,
    fields::MEMBER_COINSURANCE,
    fields::MEMBER_COPAY,
];

/// Builder for claim intake records
#[derive(Debug, Clone)]
pub struct ClaimRecordBuilder {
    values: Vec<(&'static str, Option<String>)>,
}

impl Default for ClaimRecordBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaimRecordBuilder {
    /// Creates a builder for a valid claim with net fee 80.00
    pub fn new() -> Self {
        let defaults = [
            Some("2018-03-28"),
            Some("D0180"),
            None,
            Some("GRP-1000"),
            Some("3730189502"),
            Some(NpiFixtures::primary()),
            Some("150.00"),
            Some("100.00"),
            Some("20.00"),
            Some("10.00"),
        ];
        Self {
            values: COLUMNS
                .iter()
                .zip(defaults)
                .map(|(column, value)| (*column, value.map(str::to_string)))
                .collect(),
        }
    }

    fn set(mut self, field: &str, value: Option<String>) -> Self {
        if let Some(slot) = self.values.iter_mut().find(|(column, _)| *column == field) {
            slot.1 = value;
        }
        self
    }

    pub fn service_date(self, value: &str) -> Self {
        self.set(fields::SERVICE_DATE, Some(value.to_string()))
    }

    pub fn procedure(self, value: &str) -> Self {
        self.set(fields::SUBMITTED_PROCEDURE, Some(value.to_string()))
    }

    pub fn quadrant(self, value: &str) -> Self {
        self.set(fields::QUADRANT, Some(value.to_string()))
    }

    pub fn npi(self, value: &str) -> Self {
        self.set(fields::PROVIDER_NPI, Some(value.to_string()))
    }

    pub fn provider_fees(self, value: &str) -> Self {
        self.set(fields::PROVIDER_FEES, Some(value.to_string()))
    }

    pub fn allowed_fees(self, value: &str) -> Self {
        self.set(fields::ALLOWED_FEES, Some(value.to_string()))
    }

    pub fn member_coinsurance(self, value: &str) -> Self {
        self.set(fields::MEMBER_COINSURANCE, Some(value.to_string()))
    }

    pub fn member_copay(self, value: &str) -> Self {
        self.set(fields::MEMBER_COPAY, Some(value.to_string()))
    }

    /// Sets all four amounts at once
    pub fn fees(self, provider: &str, allowed: &str, coinsurance: &str, copay: &str) -> Self {
        self.provider_fees(provider)
            .allowed_fees(allowed)
            .member_coinsurance(coinsurance)
            .member_copay(copay)
    }

    /// Removes a field entirely
    pub fn without(self, field: &str) -> Self {
        self.set(field, None)
    }

    pub fn build_raw(&self) -> RawRecord {
        RawRecord::from_pairs(
            self.values
                .iter()
                .filter_map(|(column, value)| value.as_ref().map(|v| (*column, v.clone()))),
        )
    }

    pub fn build_json(&self) -> serde_json::Value {
        let object = self
            .values
            .iter()
            .filter_map(|(column, value)| {
                value
                    .as_ref()
                    .map(|v| (column.to_string(), serde_json::Value::String(v.clone())))
            })
            .collect::<serde_json::Map<_, _>>();
        serde_json::Value::Object(object)
    }

    /// Renders the record as one CSV line in `csv_header()` column order
    pub fn build_csv_row(&self) -> String {
        self.values
            .iter()
            .map(|(_, value)| {
                let value = value.clone().unwrap_or_default();
                if value.contains(',') || value.contains('"') {
                    format!("\"{}\"", value.replace('"', "\"\""))
                } else {
                    value
                }
            })
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Validates the record into a claim
    ///
    /// # Panics
    ///
    /// Panics if the builder was configured with invalid values
    pub fn build_claim(&self) -> Claim {
        let draft = ClaimValidator::validate(&self.build_raw())
            .unwrap_or_else(|errors| panic!("builder produced an invalid claim: {:?}", errors));
        Claim::from_draft(draft)
    }
}

/// Header line matching `ClaimRecordBuilder::build_csv_row`
pub fn csv_header() -> String {
    COLUMNS.join(",")
}

/// Assembles a CSV document from builders
pub fn csv_document(records: &[ClaimRecordBuilder]) -> String {
    let mut document = csv_header();
    document.push('\n');
    for record in records {
        document.push_str(&record.build_csv_row());
        document.push('\n');
    }
    document
}
