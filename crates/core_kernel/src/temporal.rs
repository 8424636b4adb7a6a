//! Service date parsing
//!
//! Claim exports write the date of service as `M/D/YY` followed by a time
//! component (`3/28/18 0:00`). The time is always midnight and is discarded.
//! Four-digit years and ISO `YYYY-MM-DD` dates are accepted as well.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemporalError {
    #[error("service date is empty")]
    Empty,

    #[error("'{0}' is not a recognized date (expected M/D/YY, M/D/YYYY or YYYY-MM-DD)")]
    Unrecognized(String),
}

/// Parses a service date, ignoring any trailing time component
pub fn parse_service_date(input: &str) -> Result<NaiveDate, TemporalError> {
    let date_part = input
        .split_whitespace()
        .next()
        .ok_or(TemporalError::Empty)?;

    let format = if date_part.contains('-') {
        "%Y-%m-%d"
    } else {
        match date_part.rsplit('/').next() {
            Some(year) if year.len() == 4 => "%m/%d/%Y",
            _ => "%m/%d/%y",
        }
    };

    NaiveDate::parse_from_str(date_part, format)
        .map_err(|_| TemporalError::Unrecognized(input.trim().to_string()))
}
