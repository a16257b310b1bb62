//! In-memory implementations of the collaborator traits
//!
//! These are suitable for development, offline rehearsal and testing.

use crate::error::{RegistryError, ResourceError, Result};
use crate::registry::{DeploymentRegistry, VERSION_STAGE_PREFIX};
use crate::resource::ResourceManager;
use async_trait::async_trait;
use dashmap::{DashMap, DashSet};
use serde::{Deserialize, Serialize};
use stagekeep_types::{ApiRootId, ServiceContext, StageRecord};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// In-memory deployment registry
pub struct InMemoryDeploymentRegistry {
    stages: DashMap<ServiceContext, Vec<StageRecord>>,
    prefix: String,
    unreachable: AtomicBool,
    listing_failure: RwLock<Option<String>>,
}

impl InMemoryDeploymentRegistry {
    pub fn new() -> Self {
        Self::with_prefix(VERSION_STAGE_PREFIX)
    }

    /// Create a registry recognising version stages by a custom name prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            stages: DashMap::new(),
            prefix: prefix.into(),
            unreachable: AtomicBool::new(false),
            listing_failure: RwLock::new(None),
        }
    }

    /// Register a service so its API root resolves, even with no stages
    pub fn register_service(&self, ctx: &ServiceContext) {
        self.stages.entry(ctx.clone()).or_default();
    }

    /// Append a stage in discovery order
    pub fn insert_stage(&self, ctx: &ServiceContext, record: StageRecord) {
        self.stages.entry(ctx.clone()).or_default().push(record);
    }

    /// Simulate an outage: every query fails with `Unreachable`
    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    /// Make `list_versioned_stages` fail with `Storage` while the API root
    /// still resolves. `None` clears the failure.
    pub async fn fail_listing(&self, reason: Option<String>) {
        *self.listing_failure.write().await = reason;
    }

    /// All stages of a service, version stages or not
    pub fn stages(&self, ctx: &ServiceContext) -> Vec<StageRecord> {
        self.stages
            .get(ctx)
            .map(|s| s.value().clone())
            .unwrap_or_default()
    }

    /// Drop the stage of `ctx` whose resource group carries this name.
    ///
    /// Other contexts are never touched, even when their naming collides.
    pub fn remove_resource_group(&self, ctx: &ServiceContext, resource_group: &str) -> bool {
        let Some(mut stages) = self.stages.get_mut(ctx) else {
            return false;
        };
        let before = stages.len();
        stages.retain(|record| {
            record
                .version_tag
                .as_deref()
                .map(|tag| ctx.resource_group_name(tag.trim()) != resource_group)
                .unwrap_or(true)
        });
        before != stages.len()
    }

    fn check_reachable(&self) -> Result<()> {
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(RegistryError::Unreachable(
                "in-memory registry marked unreachable".into(),
            ));
        }
        Ok(())
    }

    fn not_found(ctx: &ServiceContext) -> RegistryError {
        RegistryError::ApiRootNotFound {
            context: ctx.clone(),
            reason: "no API registered for service".into(),
        }
    }
}

impl Default for InMemoryDeploymentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DeploymentRegistry for InMemoryDeploymentRegistry {
    async fn resolve_api_root(&self, ctx: &ServiceContext) -> Result<ApiRootId> {
        self.check_reachable()?;
        if self.stages.contains_key(ctx) {
            Ok(ApiRootId::new(format!("{}-{}", ctx.service, ctx.stage)))
        } else {
            Err(Self::not_found(ctx))
        }
    }

    async fn list_versioned_stages(
        &self,
        ctx: &ServiceContext,
        root: &ApiRootId,
    ) -> Result<Vec<StageRecord>> {
        self.check_reachable()?;
        if let Some(reason) = self.listing_failure.read().await.clone() {
            return Err(RegistryError::Storage(reason));
        }
        let stages = self.stages.get(ctx).ok_or_else(|| Self::not_found(ctx))?;

        let records: Vec<StageRecord> = stages
            .iter()
            .filter(|r| {
                r.name
                    .as_deref()
                    .map(|n| n.starts_with(self.prefix.as_str()))
                    .unwrap_or(true)
            })
            .cloned()
            .collect();

        debug!(root = %root, count = records.len(), "Listed version stages");
        Ok(records)
    }
}

/// A call received by [`InMemoryResourceManager`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "call", content = "resource_group", rename_all = "snake_case")]
pub enum ResourceCall {
    Delete(String),
    Wait(String),
}

/// In-memory resource manager
///
/// When linked to a registry, a completed deletion removes the matching
/// stage of the linked service context from it.
pub struct InMemoryResourceManager {
    registry: Option<(Arc<InMemoryDeploymentRegistry>, ServiceContext)>,
    delete_failures: DashMap<String, String>,
    wait_failures: DashMap<String, String>,
    wait_timeouts: DashSet<String>,
    calls: RwLock<Vec<ResourceCall>>,
    deleted: RwLock<Vec<String>>,
}

impl InMemoryResourceManager {
    pub fn new() -> Self {
        Self {
            registry: None,
            delete_failures: DashMap::new(),
            wait_failures: DashMap::new(),
            wait_timeouts: DashSet::new(),
            calls: RwLock::new(Vec::new()),
            deleted: RwLock::new(Vec::new()),
        }
    }

    /// Create a manager whose deletions are reflected in the stages `ctx`
    /// holds in `registry`
    pub fn linked(registry: Arc<InMemoryDeploymentRegistry>, ctx: ServiceContext) -> Self {
        Self {
            registry: Some((registry, ctx)),
            ..Self::new()
        }
    }

    /// Make `delete` fail for a resource group
    pub fn fail_delete(&self, resource_group: impl Into<String>, reason: impl Into<String>) {
        self.delete_failures
            .insert(resource_group.into(), reason.into());
    }

    /// Make `wait_for_deletion` fail for a resource group
    pub fn fail_wait(&self, resource_group: impl Into<String>, reason: impl Into<String>) {
        self.wait_failures.insert(resource_group.into(), reason.into());
    }

    /// Make `wait_for_deletion` time out for a resource group
    pub fn time_out_wait(&self, resource_group: impl Into<String>) {
        self.wait_timeouts.insert(resource_group.into());
    }

    /// Calls received so far, in order
    pub async fn calls(&self) -> Vec<ResourceCall> {
        self.calls.read().await.clone()
    }

    /// Resource groups whose deletion completed, in order
    pub async fn deleted(&self) -> Vec<String> {
        self.deleted.read().await.clone()
    }
}

impl Default for InMemoryResourceManager {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResourceManager for InMemoryResourceManager {
    async fn delete(&self, resource_group: &str) -> std::result::Result<(), ResourceError> {
        self.calls
            .write()
            .await
            .push(ResourceCall::Delete(resource_group.to_string()));

        if let Some(reason) = self.delete_failures.get(resource_group) {
            return Err(ResourceError::DeleteFailed {
                resource_group: resource_group.to_string(),
                reason: reason.value().clone(),
            });
        }
        Ok(())
    }

    async fn wait_for_deletion(
        &self,
        resource_group: &str,
    ) -> std::result::Result<(), ResourceError> {
        self.calls
            .write()
            .await
            .push(ResourceCall::Wait(resource_group.to_string()));

        if let Some(reason) = self.wait_failures.get(resource_group) {
            return Err(ResourceError::WaitFailed {
                resource_group: resource_group.to_string(),
                reason: reason.value().clone(),
            });
        }

        if self.wait_timeouts.contains(resource_group) {
            return Err(ResourceError::Timeout {
                resource_group: resource_group.to_string(),
            });
        }

        if let Some((registry, ctx)) = &self.registry {
            registry.remove_resource_group(ctx, resource_group);
        }
        self.deleted.write().await.push(resource_group.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> ServiceContext {
        ServiceContext::new("billing", "prod")
    }

    #[tokio::test]
    async fn test_resolve_unknown_service() {
        let registry = InMemoryDeploymentRegistry::new();
        let err = registry.resolve_api_root(&ctx()).await.unwrap_err();
        assert!(matches!(err, RegistryError::ApiRootNotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_filters_non_version_stages() {
        let registry = InMemoryDeploymentRegistry::new();
        registry.insert_stage(&ctx(), StageRecord::versioned("v1-0-0"));
        registry.insert_stage(&ctx(), StageRecord::new("prod", "v9-9-9"));
        registry.insert_stage(
            &ctx(),
            StageRecord {
                name: None,
                version_tag: Some("v0-1-0".into()),
            },
        );

        let root = registry.resolve_api_root(&ctx()).await.unwrap();
        let records = registry.list_versioned_stages(&ctx(), &root).await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name.as_deref(), Some("v1-0-0"));
        assert!(records[1].name.is_none());
    }

    #[tokio::test]
    async fn test_unreachable() {
        let registry = InMemoryDeploymentRegistry::new();
        registry.register_service(&ctx());
        registry.set_unreachable(true);
        assert!(matches!(
            registry.resolve_api_root(&ctx()).await,
            Err(RegistryError::Unreachable(_))
        ));
    }

    #[tokio::test]
    async fn test_linked_deletion_removes_stage() {
        let registry = Arc::new(InMemoryDeploymentRegistry::new());
        registry.insert_stage(&ctx(), StageRecord::versioned("v1-0-0"));
        registry.insert_stage(&ctx(), StageRecord::versioned("v2-0-0"));
        let manager = InMemoryResourceManager::linked(registry.clone(), ctx());

        manager.delete("billing-prod-v1-0-0").await.unwrap();
        manager.wait_for_deletion("billing-prod-v1-0-0").await.unwrap();

        let remaining = registry.stages(&ctx());
        assert_eq!(remaining, vec![StageRecord::versioned("v2-0-0")]);
        assert_eq!(
            manager.calls().await,
            vec![
                ResourceCall::Delete("billing-prod-v1-0-0".into()),
                ResourceCall::Wait("billing-prod-v1-0-0".into()),
            ]
        );
    }

    #[tokio::test]
    async fn test_listing_failure_after_root_resolves() {
        let registry = InMemoryDeploymentRegistry::new();
        registry.insert_stage(&ctx(), StageRecord::versioned("v1-0-0"));
        registry.fail_listing(Some("throttled".into())).await;

        let root = registry.resolve_api_root(&ctx()).await.unwrap();
        assert!(matches!(
            registry.list_versioned_stages(&ctx(), &root).await,
            Err(RegistryError::Storage(reason)) if reason == "throttled"
        ));

        registry.fail_listing(None).await;
        assert_eq!(
            registry.list_versioned_stages(&ctx(), &root).await.unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn test_linked_deletion_stays_in_its_context() {
        // Both contexts name their v1-0-0 group "a-b-c-v1-0-0".
        let owner = ServiceContext::new("a", "b-c");
        let bystander = ServiceContext::new("a-b", "c");
        assert_eq!(
            owner.resource_group_name("v1-0-0"),
            bystander.resource_group_name("v1-0-0")
        );

        let registry = Arc::new(InMemoryDeploymentRegistry::new());
        registry.insert_stage(&owner, StageRecord::versioned("v1-0-0"));
        registry.insert_stage(&bystander, StageRecord::versioned("v1-0-0"));
        let manager = InMemoryResourceManager::linked(registry.clone(), owner.clone());

        manager.delete("a-b-c-v1-0-0").await.unwrap();
        manager.wait_for_deletion("a-b-c-v1-0-0").await.unwrap();

        assert!(registry.stages(&owner).is_empty());
        assert_eq!(
            registry.stages(&bystander),
            vec![StageRecord::versioned("v1-0-0")]
        );
    }

    #[tokio::test]
    async fn test_wait_timeout_keeps_stage() {
        let registry = Arc::new(InMemoryDeploymentRegistry::new());
        registry.insert_stage(&ctx(), StageRecord::versioned("v1-0-0"));
        let manager = InMemoryResourceManager::linked(registry.clone(), ctx());
        manager.time_out_wait("billing-prod-v1-0-0");

        manager.delete("billing-prod-v1-0-0").await.unwrap();
        assert!(matches!(
            manager.wait_for_deletion("billing-prod-v1-0-0").await,
            Err(ResourceError::Timeout { .. })
        ));
        assert_eq!(registry.stages(&ctx()).len(), 1);
        assert!(manager.deleted().await.is_empty());
    }

    #[test]
    fn test_call_log_serialization() {
        let json = serde_json::to_value(ResourceCall::Delete("billing-prod-v1-0-0".into())).unwrap();
        assert_eq!(json["call"], "delete");
        assert_eq!(json["resource_group"], "billing-prod-v1-0-0");
    }

    #[tokio::test]
    async fn test_injected_failures() {
        let manager = InMemoryResourceManager::new();
        manager.fail_delete("a", "access denied");
        manager.fail_wait("b", "DELETE_FAILED");

        assert!(matches!(
            manager.delete("a").await,
            Err(ResourceError::DeleteFailed { .. })
        ));
        manager.delete("b").await.unwrap();
        assert!(matches!(
            manager.wait_for_deletion("b").await,
            Err(ResourceError::WaitFailed { .. })
        ));
        assert!(manager.deleted().await.is_empty());
    }
}
