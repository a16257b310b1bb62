//! Retention planning
//!
//! Pure partitioning of deployed versions into the ones to keep and the ones
//! to retire. Nothing here performs I/O.

use crate::config::RetentionPolicy;
use serde::Serialize;
use stagekeep_types::DeployedVersion;

/// Result of planning: which versions stay and which are torn down.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RetentionDecision {
    /// Highest-ordered versions, ascending.
    pub keep: Vec<DeployedVersion>,
    /// Everything older, ascending (oldest first).
    pub retire: Vec<DeployedVersion>,
}

impl RetentionDecision {
    pub fn total(&self) -> usize {
        self.keep.len() + self.retire.len()
    }
}

/// Keeps the newest `retention_count` versions and retires the rest.
#[derive(Debug, Clone, Copy)]
pub struct RetentionPlanner {
    policy: RetentionPolicy,
}

impl RetentionPlanner {
    pub fn new(policy: RetentionPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> RetentionPolicy {
        self.policy
    }

    /// Stable ascending sort by version token.
    ///
    /// Versions whose tag could not be parsed sort first, so they never take
    /// a slot in the retention window from a readable version.
    pub fn order(mut versions: Vec<DeployedVersion>) -> Vec<DeployedVersion> {
        versions.sort_by(|a, b| a.token.cmp(&b.token));
        versions
    }

    /// Partition an ascending sequence. The tail of length
    /// `min(retention_count, len)` is kept.
    pub fn plan(&self, ordered: Vec<DeployedVersion>) -> RetentionDecision {
        let split = ordered.len().saturating_sub(self.policy.count());
        let mut retire = ordered;
        let keep = retire.split_off(split);
        RetentionDecision { keep, retire }
    }
}
