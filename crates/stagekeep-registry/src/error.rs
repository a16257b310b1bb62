//! Registry and resource manager error types

use stagekeep_types::ServiceContext;
use thiserror::Error;

/// Registry errors
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("API root not found for {context}: {reason}")]
    ApiRootNotFound {
        context: ServiceContext,
        reason: String,
    },

    #[error("Registry unreachable: {0}")]
    Unreachable(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Resource manager errors
#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("Delete failed for {resource_group}: {reason}")]
    DeleteFailed {
        resource_group: String,
        reason: String,
    },

    #[error("Waiting for deletion of {resource_group} failed: {reason}")]
    WaitFailed {
        resource_group: String,
        reason: String,
    },

    #[error("Timeout waiting for deletion of {resource_group}")]
    Timeout { resource_group: String },
}

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;
