//! Stage snapshot files
//!
//! A snapshot is a local copy of a service's stage listing, in JSON or YAML
//! (chosen by file extension). The CLI loads it into the in-memory registry
//! and writes the surviving stages back after a cleanup.

use crate::error::{CliError, CliResult};
use serde::{Deserialize, Serialize};
use stagekeep_registry::InMemoryDeploymentRegistry;
use stagekeep_types::{ServiceContext, StageRecord};
use std::path::Path;
use std::sync::Arc;

/// Serialized stage listing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StageSnapshot {
    #[serde(default)]
    pub service: Option<String>,

    #[serde(default)]
    pub stage: Option<String>,

    /// Stages in discovery order
    #[serde(default)]
    pub stages: Vec<StageRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SnapshotFormat {
    Json,
    Yaml,
}

impl SnapshotFormat {
    fn of(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => SnapshotFormat::Yaml,
            _ => SnapshotFormat::Json,
        }
    }
}

impl StageSnapshot {
    pub fn load(path: &Path) -> CliResult<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| CliError::Snapshot(format!("{}: {}", path.display(), e)))?;

        let snapshot = match SnapshotFormat::of(path) {
            SnapshotFormat::Json => serde_json::from_str(&contents)?,
            SnapshotFormat::Yaml => serde_yaml::from_str(&contents)?,
        };
        Ok(snapshot)
    }

    pub fn save(&self, path: &Path) -> CliResult<()> {
        let contents = match SnapshotFormat::of(path) {
            SnapshotFormat::Json => serde_json::to_string_pretty(self)?,
            SnapshotFormat::Yaml => serde_yaml::to_string(self)?,
        };
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Load the stages into a fresh registry under `ctx`
    pub fn to_registry(&self, ctx: &ServiceContext) -> Arc<InMemoryDeploymentRegistry> {
        let registry = Arc::new(InMemoryDeploymentRegistry::new());
        registry.register_service(ctx);
        for record in &self.stages {
            registry.insert_stage(ctx, record.clone());
        }
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_by_extension() {
        assert_eq!(SnapshotFormat::of(Path::new("a.yml")), SnapshotFormat::Yaml);
        assert_eq!(SnapshotFormat::of(Path::new("a.yaml")), SnapshotFormat::Yaml);
        assert_eq!(SnapshotFormat::of(Path::new("a.json")), SnapshotFormat::Json);
        assert_eq!(SnapshotFormat::of(Path::new("stages")), SnapshotFormat::Json);
    }

    #[test]
    fn test_yaml_with_unreadable_fields() {
        let snapshot: StageSnapshot = serde_yaml::from_str(
            "service: billing\nstages:\n  - name: v1-0-0\n    version_tag: v1-0-0\n  - name: v-old\n",
        )
        .unwrap();
        assert_eq!(snapshot.service.as_deref(), Some("billing"));
        assert!(snapshot.stage.is_none());
        assert_eq!(snapshot.stages.len(), 2);
        assert!(snapshot.stages[1].version_tag.is_none());
    }

    #[test]
    fn test_to_registry_keeps_discovery_order() {
        let snapshot = StageSnapshot {
            service: None,
            stage: None,
            stages: vec![StageRecord::versioned("v2-0-0"), StageRecord::versioned("v1-0-0")],
        };
        let ctx = ServiceContext::new("billing", "prod");
        let registry = snapshot.to_registry(&ctx);
        assert_eq!(registry.stages(&ctx), snapshot.stages);
    }
}
