//! Lifecycle error types

use stagekeep_registry::RegistryError;
use stagekeep_types::ServiceContext;
use thiserror::Error;

/// Lifecycle errors
///
/// Every variant is fatal to the operation that raised it. Per-version
/// teardown failures never surface here; they are recorded in the report.
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("No retention policy configured: retention_count is required")]
    MissingRetentionPolicy,

    #[error("Invalid retention policy: retention_count must be a positive integer, got {value}")]
    InvalidRetentionPolicy { value: i64 },

    #[error("No candidate version supplied")]
    MissingCandidateVersion,

    #[error("Invalid version format: '{candidate}' (expected {expected})")]
    InvalidFormat { candidate: String, expected: String },

    #[error("Version {candidate} must be greater than the latest deployed version {latest}")]
    VersionNotIncreasing { candidate: String, latest: String },

    #[error("Service context is undefined: '{0}'")]
    ServiceUndefined(String),

    #[error("REST API root not found for {context}: {reason}")]
    RestApiRootNotFound {
        context: ServiceContext,
        reason: String,
    },

    #[error("Registry unreachable: {0}")]
    RegistryUnreachable(#[source] RegistryError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<RegistryError> for LifecycleError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::ApiRootNotFound { context, reason } => {
                LifecycleError::RestApiRootNotFound { context, reason }
            }
            other => LifecycleError::RegistryUnreachable(other),
        }
    }
}

/// Result type for lifecycle operations
pub type Result<T> = std::result::Result<T, LifecycleError>;
