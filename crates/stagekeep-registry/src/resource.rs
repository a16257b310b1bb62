//! Resource manager trait

use crate::error::ResourceError;
use async_trait::async_trait;

/// Tears down the resource group backing one version.
///
/// Both operations may fail independently. Retry, backoff and timeouts are
/// the implementation's concern.
#[async_trait]
pub trait ResourceManager: Send + Sync {
    /// Request deletion of a resource group
    async fn delete(&self, resource_group: &str) -> Result<(), ResourceError>;

    /// Block until the deletion has completed
    async fn wait_for_deletion(&self, resource_group: &str) -> Result<(), ResourceError>;
}
