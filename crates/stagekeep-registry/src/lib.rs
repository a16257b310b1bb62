//! stagekeep Registry - Collaborator traits and implementations
//!
//! The lifecycle core never talks to a cloud provider directly. It consumes
//! two collaborators:
//!
//! - **DeploymentRegistry**: Source of truth for which version stages exist
//! - **ResourceManager**: Deletes a version's resource group and waits for completion
//!
//! ## In-Memory vs Provider-Backed
//!
//! The crate provides in-memory implementations suitable for development,
//! offline rehearsal and testing. Provider-backed implementations (API
//! gateway stage listing, stack deletion) implement the same traits.

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod error;
pub mod memory;
pub mod registry;
pub mod resource;

// Re-exports
pub use error::{RegistryError, ResourceError, Result};
pub use memory::{InMemoryDeploymentRegistry, InMemoryResourceManager, ResourceCall};
pub use registry::{DeploymentRegistry, VERSION_STAGE_PREFIX};
pub use resource::ResourceManager;
