//! Claim processing service
//!
//! Ties intake, validation, fee computation and storage together. Every
//! record of a submission is validated independently; what happens next
//! depends on the [`BatchMode`]:
//!
//! - [`BatchMode::Reject`] (default): if any record fails, the submission is
//!   rejected with every failure listed and nothing is stored.
//! - [`BatchMode::Skip`]: valid records are stored, invalid ones are returned
//!   as rejections alongside them.

use std::sync::Arc;

use core_kernel::PortError;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::aggregation::{ProviderLimit, ProviderTotal};
use crate::claim::Claim;
use crate::error::ClaimError;
use crate::intake::{IntakeRecord, RecordLocator};
use crate::ports::ClaimRepository;
use crate::validation::{ClaimValidator, FieldError};

/// Attempts at storing a batch when its claim numbers collide
const MAX_INSERT_ATTEMPTS: u32 = 5;

/// Handling of invalid records within a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchMode {
    /// All-or-nothing
    #[default]
    Reject,
    /// Store the valid records, report the rest
    Skip,
}

/// A record that failed validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordRejection {
    pub record: RecordLocator,
    pub errors: Vec<FieldError>,
}

/// Result of a processed submission
#[derive(Debug, Clone, Default)]
pub struct ProcessOutcome {
    /// Claims that were stored, in submission order
    pub accepted: Vec<Claim>,
    /// Records that were skipped
    pub rejected: Vec<RecordRejection>,
}

/// Application service for claim intake and provider ranking
#[derive(Clone)]
pub struct ClaimProcessor {
    repository: Arc<dyn ClaimRepository>,
}

impl ClaimProcessor {
    /// Creates a processor backed by the given repository
    pub fn new(repository: Arc<dyn ClaimRepository>) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &Arc<dyn ClaimRepository> {
        &self.repository
    }

    /// Validates every record and builds claims for the ones that pass.
    ///
    /// Nothing is stored; this is the pure half of [`ClaimProcessor::process`].
    pub fn prepare(records: Vec<IntakeRecord>) -> (Vec<Claim>, Vec<RecordRejection>) {
        let mut accepted = Vec::with_capacity(records.len());
        let mut rejected = Vec::new();

        for IntakeRecord { locator, parsed } in records {
            match parsed.and_then(|raw| ClaimValidator::validate(&raw)) {
                Ok(draft) => accepted.push(Claim::from_draft(draft)),
                Err(errors) => rejected.push(RecordRejection {
                    record: locator,
                    errors,
                }),
            }
        }

        (accepted, rejected)
    }

    /// Validates, computes and stores a submission
    ///
    /// # Errors
    ///
    /// - `ClaimError::Validation` in [`BatchMode::Reject`] when any record fails
    /// - `ClaimError::Storage` when the repository cannot store the batch
    pub async fn process(
        &self,
        records: Vec<IntakeRecord>,
        mode: BatchMode,
    ) -> Result<ProcessOutcome, ClaimError> {
        let submitted = records.len();
        let (mut accepted, rejected) = Self::prepare(records);

        if mode == BatchMode::Reject && !rejected.is_empty() {
            warn!(
                submitted,
                rejected = rejected.len(),
                "Submission rejected: records failed validation"
            );
            return Err(ClaimError::Validation(rejected));
        }

        if !accepted.is_empty() {
            self.store(&mut accepted).await?;
        }

        info!(
            submitted,
            accepted = accepted.len(),
            rejected = rejected.len(),
            "Claims processed"
        );

        Ok(ProcessOutcome { accepted, rejected })
    }

    /// Inserts a batch, assigning new claim numbers after a uniqueness conflict
    async fn store(&self, claims: &mut [Claim]) -> Result<(), ClaimError> {
        let mut attempt = 1;
        loop {
            match self.repository.insert_claims(claims).await {
                Ok(()) => return Ok(()),
                Err(PortError::Conflict(reason)) if attempt < MAX_INSERT_ATTEMPTS => {
                    warn!(attempt, %reason, "Claim number collision, renumbering batch");
                    claims.iter_mut().for_each(Claim::renumber);
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Returns the providers with the highest summed net fee
    pub async fn top_providers(&self, limit: ProviderLimit) -> Result<Vec<ProviderTotal>, ClaimError> {
        Ok(self.repository.top_providers(limit).await?)
    }
}
