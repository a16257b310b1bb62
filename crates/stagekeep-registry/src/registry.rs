//! Deployment registry trait
//!
//! The DeploymentRegistry lists the version stages currently provisioned for
//! a service. It is authoritative: the lifecycle core keeps no store of its own.

use crate::error::Result;
use async_trait::async_trait;
use stagekeep_types::{ApiRootId, ServiceContext, StageRecord};

/// Name prefix marking a stage as a version stage.
pub const VERSION_STAGE_PREFIX: &str = "v";

/// Registry of deployed version stages
#[async_trait]
pub trait DeploymentRegistry: Send + Sync {
    /// Resolve the API root that owns the service's stages
    async fn resolve_api_root(&self, ctx: &ServiceContext) -> Result<ApiRootId>;

    /// List version stages under an API root, in discovery order
    ///
    /// Records are returned raw. Stages whose name cannot be read are still
    /// returned so the caller can account for them.
    async fn list_versioned_stages(
        &self,
        ctx: &ServiceContext,
        root: &ApiRootId,
    ) -> Result<Vec<StageRecord>>;
}
