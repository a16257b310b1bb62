//! Lifecycle configuration.
//!
//! The configuration is validated once, when the orchestrator is built, so a
//! missing or non-positive retention count is rejected before any registry
//! or resource manager call.

use std::num::NonZeroUsize;
use std::path::Path;

use serde::{Deserialize, Serialize};
use stagekeep_types::VersionSyntax;

use crate::error::{LifecycleError, Result};

/// Configuration for version gating and retention.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecycleConfig {
    /// Number of most recent versions to keep. Required.
    pub retention_count: Option<i64>,

    /// Version about to be published, e.g. `v1-4-0`.
    pub candidate_version: Option<String>,

    /// Plan and report retirements without calling the resource manager.
    pub dry_run: bool,

    /// Version syntax for candidates and tags.
    pub syntax: VersionSyntax,
}

impl LifecycleConfig {
    /// Create a config keeping the `retention_count` most recent versions.
    pub fn new(retention_count: i64) -> Self {
        Self {
            retention_count: Some(retention_count),
            ..Self::default()
        }
    }

    pub fn with_candidate(mut self, candidate: impl Into<String>) -> Self {
        self.candidate_version = Some(candidate.into());
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_syntax(mut self, syntax: VersionSyntax) -> Self {
        self.syntax = syntax;
        self
    }

    /// Check the retention count and turn it into a policy.
    pub fn validate(&self) -> Result<RetentionPolicy> {
        let value = self
            .retention_count
            .ok_or(LifecycleError::MissingRetentionPolicy)?;

        usize::try_from(value)
            .ok()
            .and_then(NonZeroUsize::new)
            .map(RetentionPolicy)
            .ok_or(LifecycleError::InvalidRetentionPolicy { value })
    }

    /// Parse a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| LifecycleError::Config(e.to_string()))
    }

    /// Load a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| LifecycleError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&contents)
    }
}

/// A validated, strictly positive retention count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RetentionPolicy(NonZeroUsize);

impl RetentionPolicy {
    pub fn new(count: usize) -> Option<Self> {
        NonZeroUsize::new(count).map(Self)
    }

    pub fn count(&self) -> usize {
        self.0.get()
    }
}
