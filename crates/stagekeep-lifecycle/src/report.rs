//! Cleanup reports

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stagekeep_types::{RunId, ServiceContext, SkipReason};

/// Terminal state of one retirement candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RetirementStatus {
    /// Deleted and confirmed gone.
    Retired,
    /// Delete or wait failed; the run carried on.
    Failed { error: String },
    /// Not attempted because the record could not be read.
    Skipped { reason: SkipReason },
    /// Dry run: would have been deleted.
    Planned,
}

/// Outcome for a single version selected for retirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetirementOutcome {
    pub identifier: Option<String>,
    pub version: Option<String>,
    pub resource_group: Option<String>,
    pub status: RetirementStatus,
}

/// Summary of one cleanup run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanupReport {
    pub run_id: RunId,
    pub context: ServiceContext,
    pub kept: usize,
    pub retired_successfully: usize,
    pub retired_with_error: usize,
    pub skipped: usize,
    pub planned: usize,
    /// Per-version outcomes, oldest first.
    pub outcomes: Vec<RetirementOutcome>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl CleanupReport {
    pub fn new(run_id: RunId, context: ServiceContext) -> Self {
        Self {
            run_id,
            context,
            kept: 0,
            retired_successfully: 0,
            retired_with_error: 0,
            skipped: 0,
            planned: 0,
            outcomes: Vec::new(),
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    /// Append an outcome and bump the matching counter.
    pub fn record(&mut self, outcome: RetirementOutcome) {
        match outcome.status {
            RetirementStatus::Retired => self.retired_successfully += 1,
            RetirementStatus::Failed { .. } => self.retired_with_error += 1,
            RetirementStatus::Skipped { .. } => self.skipped += 1,
            RetirementStatus::Planned => self.planned += 1,
        }
        self.outcomes.push(outcome);
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Versions the run tried to tear down.
    pub fn attempted(&self) -> usize {
        self.retired_successfully + self.retired_with_error
    }

    /// True when no teardown failed.
    pub fn is_clean(&self) -> bool {
        self.retired_with_error == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &RetirementOutcome> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, RetirementStatus::Failed { .. }))
    }
}
