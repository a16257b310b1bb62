//! stagekeep Lifecycle - Version gate and retention orchestration
//!
//! Decides whether a proposed version may be published, computes which
//! deployed versions fall outside the retention window, and tears them down
//! through a [`ResourceManager`](stagekeep_registry::ResourceManager).
//!
//! ## Failure Semantics
//!
//! - Configuration, format and ordering errors are fatal and raised before
//!   any teardown happens.
//! - Registry resolution errors abort the whole cleanup run.
//! - Teardown errors are isolated per version: they are logged, recorded in
//!   the [`CleanupReport`], and the next version is still processed.
//!
//! ## Usage
//!
//! ```no_run
//! use stagekeep_lifecycle::{LifecycleConfig, LifecycleOrchestrator};
//! use stagekeep_registry::{InMemoryDeploymentRegistry, InMemoryResourceManager};
//! use stagekeep_types::ServiceContext;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let ctx = ServiceContext::new("billing", "prod");
//! let registry = Arc::new(InMemoryDeploymentRegistry::new());
//! let resources = Arc::new(InMemoryResourceManager::linked(registry.clone(), ctx.clone()));
//!
//! let config = LifecycleConfig::new(3).with_candidate("v1-4-0");
//! let orchestrator = LifecycleOrchestrator::new(config, registry, resources)?;
//!
//! orchestrator.gate_candidate(&ctx).await?;
//! // ... deploy v1-4-0 ...
//! let report = orchestrator.after_deploy(&ctx).await?;
//! println!("retired {} versions", report.retired_successfully);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod config;
pub mod error;
pub mod orchestrator;
pub mod planner;
pub mod report;

// Re-exports
pub use config::{LifecycleConfig, RetentionPolicy};
pub use error::{LifecycleError, Result};
pub use orchestrator::LifecycleOrchestrator;
pub use planner::{RetentionDecision, RetentionPlanner};
pub use report::{CleanupReport, RetirementOutcome, RetirementStatus};
