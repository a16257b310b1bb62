//! Event types for lifecycle observability
//!
//! Every orchestrator decision is published as a [`LifecycleEvent`] wrapped in
//! an envelope, in the order the decisions were made.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for one orchestration run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(Uuid);

impl RunId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "run:{}", self.0)
    }
}

/// Event severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventSeverity {
    Info,
    Success,
    Warning,
    Error,
}

/// Why a retirement candidate was not torn down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// The stage identifier could not be read.
    MissingIdentifier,
    /// The version tag was absent or unparseable.
    UnreadableVersionTag,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingIdentifier => write!(f, "stage identifier is unreadable"),
            SkipReason::UnreadableVersionTag => write!(f, "version tag is unreadable"),
        }
    }
}

/// Phases of one cleanup run.
///
/// `Idle -> QueryingRegistry -> (Aborted | Planning -> Retiring* -> Done)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CleanupPhase {
    Idle,
    QueryingRegistry,
    Planning,
    Retiring { index: usize, total: usize },
    Done,
    Aborted,
}

/// Lifecycle events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LifecycleEvent {
    CandidateAccepted {
        candidate: String,
        retention_count: usize,
    },
    PhaseChanged {
        phase: CleanupPhase,
    },
    RetirementSkipped {
        identifier: Option<String>,
        version: Option<String>,
        reason: SkipReason,
    },
    RetirementPlanned {
        version: String,
        resource_group: String,
    },
    VersionRetired {
        version: String,
        resource_group: String,
    },
    RetirementFailed {
        version: String,
        resource_group: String,
        error: String,
    },
    CleanupCompleted {
        kept: usize,
        retired_successfully: usize,
        retired_with_error: usize,
        skipped: usize,
        planned: usize,
    },
    CleanupAborted {
        reason: String,
    },
}

impl LifecycleEvent {
    pub fn severity(&self) -> EventSeverity {
        match self {
            LifecycleEvent::CandidateAccepted { .. } | LifecycleEvent::VersionRetired { .. } => {
                EventSeverity::Success
            }
            LifecycleEvent::RetirementSkipped { .. } => EventSeverity::Warning,
            LifecycleEvent::RetirementFailed { .. } | LifecycleEvent::CleanupAborted { .. } => {
                EventSeverity::Error
            }
            LifecycleEvent::CleanupCompleted {
                retired_with_error, ..
            } if *retired_with_error > 0 => EventSeverity::Warning,
            _ => EventSeverity::Info,
        }
    }
}

/// Envelope wrapping all lifecycle events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifecycleEventEnvelope {
    /// Unique event ID
    pub id: Uuid,

    /// Event timestamp
    pub timestamp: chrono::DateTime<chrono::Utc>,

    pub severity: EventSeverity,

    /// Run this event belongs to; `None` for validation events
    pub run_id: Option<RunId>,

    pub event: LifecycleEvent,
}

impl LifecycleEventEnvelope {
    pub fn new(run_id: Option<RunId>, event: LifecycleEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: chrono::Utc::now(),
            severity: event.severity(),
            run_id,
            event,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_mapping() {
        let failed = LifecycleEvent::RetirementFailed {
            version: "v1-0-0".into(),
            resource_group: "svc-prod-v1-0-0".into(),
            error: "stack stuck".into(),
        };
        assert_eq!(failed.severity(), EventSeverity::Error);

        let partial = LifecycleEvent::CleanupCompleted {
            kept: 2,
            retired_successfully: 1,
            retired_with_error: 1,
            skipped: 0,
            planned: 0,
        };
        assert_eq!(partial.severity(), EventSeverity::Warning);

        let skipped = LifecycleEvent::RetirementSkipped {
            identifier: None,
            version: Some("v1".into()),
            reason: SkipReason::MissingIdentifier,
        };
        assert_eq!(skipped.severity(), EventSeverity::Warning);
    }

    #[test]
    fn test_envelope_copies_severity() {
        let run = RunId::generate();
        let env = LifecycleEventEnvelope::new(
            Some(run),
            LifecycleEvent::PhaseChanged {
                phase: CleanupPhase::Planning,
            },
        );
        assert_eq!(env.severity, EventSeverity::Info);
        assert_eq!(env.run_id, Some(run));
        assert!(run.to_string().starts_with("run:"));
    }
}
