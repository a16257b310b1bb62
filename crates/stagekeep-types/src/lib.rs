//! stagekeep Types - Core types for API stage version lifecycles
//!
//! A service publishes each release of its API as a separate, version-tagged
//! stage. stagekeep decides whether a new version may be published and which
//! old stages fall outside the retention window.
//!
//! ## Key Concepts
//!
//! - **VersionToken**: Parsed `v<major>-<minor>-<patch>` version, zero-padded on compare
//! - **StageRecord**: Raw stage as reported by a deployment registry
//! - **DeployedVersion**: A stage with its version tag parsed (or marked unreadable)
//! - **ServiceContext**: The service/stage pair every operation runs against
//! - **Events**: Structured lifecycle stream emitted by the orchestrator

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod events;
pub mod stage;
pub mod version;

// Re-export main types
pub use events::{
    CleanupPhase, EventSeverity, LifecycleEvent, LifecycleEventEnvelope, RunId, SkipReason,
};
pub use stage::{ApiRootId, DeployedVersion, ServiceContext, StageRecord};
pub use version::{VersionComparator, VersionError, VersionSyntax, VersionToken};
