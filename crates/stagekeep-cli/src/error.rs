//! CLI error types

use stagekeep_lifecycle::LifecycleError;
use thiserror::Error;

/// CLI error types
#[derive(Debug, Error)]
pub enum CliError {
    /// Lifecycle operation failed
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Snapshot file error
    #[error("Snapshot error: {0}")]
    Snapshot(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;
