//! CSV claim import
//!
//! Reads a claim export with a header row. Column names go through the same
//! key normalization as JSON, rows shorter than the header are padded with
//! blanks, and blank lines are skipped. A row the CSV parser cannot read is
//! reported against its line number instead of aborting the whole file.

use std::io::Read;

use csv::{ReaderBuilder, Trim};
use tracing::{debug, warn};

use crate::error::ClaimError;
use crate::intake::{fields, IntakeRecord, RawRecord, RecordLocator};
use crate::validation::FieldError;

/// Reads every data row of a CSV submission
pub fn read_csv_submission<R: Read>(reader: R) -> Result<Vec<IntakeRecord>, ClaimError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| ClaimError::malformed(format!("unreadable CSV header: {}", e)))?
        .clone();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(ClaimError::malformed("CSV header row is missing"));
    }

    let mut records = Vec::new();

    for (row_idx, result) in rdr.records().enumerate() {
        // +2 for 1-indexed lines and the header row
        let fallback_line = row_idx as u64 + 2;

        match result {
            Ok(row) => {
                if row.iter().all(|cell| cell.is_empty()) {
                    continue;
                }

                let line = row.position().map(|p| p.line()).unwrap_or(fallback_line);
                let pairs = headers
                    .iter()
                    .enumerate()
                    .map(|(i, header)| (header, row.get(i).unwrap_or("")));

                records.push(IntakeRecord {
                    locator: RecordLocator::Line(line),
                    parsed: Ok(RawRecord::from_pairs(pairs)),
                });
            }
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or(fallback_line);
                warn!(line, error = %e, "Unreadable CSV row");

                records.push(IntakeRecord {
                    locator: RecordLocator::Line(line),
                    parsed: Err(vec![FieldError::new(
                        fields::RECORD,
                        format!("unreadable CSV row: {}", e),
                    )]),
                });
            }
        }
    }

    debug!(rows = records.len(), "CSV submission read");
    Ok(records)
}
