//! Strongly-typed identifiers for claims
//!
//! Every claim carries two identifiers: a time-ordered UUID used as the
//! storage key, and a short human-readable claim number (`CLM-1A2B3C4D`)
//! handed back to submitters.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Storage identifier of a claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimId(Uuid);

impl ClaimId {
    /// Creates a new time-ordered identifier (v7)
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates from an existing UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ClaimId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ClaimId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ClaimId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl From<Uuid> for ClaimId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<ClaimId> for Uuid {
    fn from(id: ClaimId) -> Uuid {
        id.0
    }
}

/// Error returned when a claim number does not have the `CLM-XXXXXXXX` shape
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid claim number '{0}'")]
pub struct InvalidClaimNumber(pub String);

/// Human-readable claim number: `CLM-` followed by 8 uppercase hex digits
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClaimNumber(String);

impl ClaimNumber {
    pub const PREFIX: &'static str = "CLM-";
    const SUFFIX_LEN: usize = 8;

    /// Generates a fresh random claim number
    pub fn generate() -> Self {
        let hex = Uuid::new_v4().simple().to_string();
        Self(format!("{}{}", Self::PREFIX, hex[..Self::SUFFIX_LEN].to_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClaimNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ClaimNumber {
    type Err = InvalidClaimNumber;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let suffix = s
            .strip_prefix(Self::PREFIX)
            .ok_or_else(|| InvalidClaimNumber(s.to_string()))?;

        let well_formed = suffix.len() == Self::SUFFIX_LEN
            && suffix
                .chars()
                .all(|c| c.is_ascii_digit() || matches!(c, 'A'..='F'));

        if well_formed {
            Ok(Self(s.to_string()))
        } else {
            Err(InvalidClaimNumber(s.to_string()))
        }
    }
}

impl TryFrom<String> for ClaimNumber {
    type Error = InvalidClaimNumber;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ClaimNumber> for String {
    fn from(number: ClaimNumber) -> String {
        number.0
    }
}
