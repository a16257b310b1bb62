//! Command implementations

pub mod cleanup;
pub mod plan;
pub mod validate;

use crate::error::{CliError, CliResult};
use crate::snapshot::StageSnapshot;
use stagekeep_lifecycle::{LifecycleConfig, LifecycleOrchestrator};
use stagekeep_registry::{InMemoryDeploymentRegistry, InMemoryResourceManager};
use stagekeep_types::ServiceContext;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// A loaded snapshot wired to in-memory collaborators
pub struct Workspace {
    pub ctx: ServiceContext,
    path: PathBuf,
    registry: Arc<InMemoryDeploymentRegistry>,
    resources: Arc<InMemoryResourceManager>,
}

impl Workspace {
    /// Load a snapshot. Explicit service/stage win over the snapshot's own.
    pub fn open(path: &Path, service: Option<String>, stage: Option<String>) -> CliResult<Self> {
        let snapshot = StageSnapshot::load(path)?;
        let ctx = ServiceContext::new(
            service.or(snapshot.service.clone()).unwrap_or_default(),
            stage.or(snapshot.stage.clone()).unwrap_or_default(),
        );
        debug!(
            path = %path.display(),
            context = %ctx,
            stages = snapshot.stages.len(),
            "Loaded stage snapshot"
        );
        let registry = snapshot.to_registry(&ctx);
        let resources = Arc::new(InMemoryResourceManager::linked(
            registry.clone(),
            ctx.clone(),
        ));

        Ok(Self {
            ctx,
            path: path.to_path_buf(),
            registry,
            resources,
        })
    }

    pub fn orchestrator(&self, config: LifecycleConfig) -> CliResult<LifecycleOrchestrator> {
        Ok(LifecycleOrchestrator::new(
            config,
            self.registry.clone(),
            self.resources.clone(),
        )?)
    }

    /// Write the registry's current stages back to the snapshot file
    pub fn persist(&self) -> CliResult<()> {
        let snapshot = StageSnapshot {
            service: Some(self.ctx.service.clone()),
            stage: Some(self.ctx.stage.clone()),
            stages: self.registry.stages(&self.ctx),
        };
        snapshot.save(&self.path)?;
        debug!(
            path = %self.path.display(),
            stages = snapshot.stages.len(),
            "Saved stage snapshot"
        );
        Ok(())
    }
}

/// Resolve the snapshot path from the flag or the config file
pub fn snapshot_path(flag: Option<PathBuf>, configured: Option<PathBuf>) -> CliResult<PathBuf> {
    flag.or(configured).ok_or_else(|| {
        CliError::InvalidInput("no stage snapshot given (use --snapshot)".into())
    })
}
