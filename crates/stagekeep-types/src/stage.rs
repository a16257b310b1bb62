//! Stage records and deployed versions

use crate::version::{VersionComparator, VersionToken};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The service and deployment stage an operation runs against.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServiceContext {
    pub service: String,
    pub stage: String,
}

impl ServiceContext {
    pub fn new(service: impl Into<String>, stage: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            stage: stage.into(),
        }
    }

    /// Both the service and the stage must be non-blank.
    pub fn is_defined(&self) -> bool {
        !self.service.trim().is_empty() && !self.stage.trim().is_empty()
    }

    /// Name of the resource group provisioned for one version of this service.
    pub fn resource_group_name(&self, version_tag: &str) -> String {
        format!("{}-{}-{}", self.service, self.stage, version_tag)
    }
}

impl fmt::Display for ServiceContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.service, self.stage)
    }
}

/// Addressable root of a service's API, resolved before stages are listed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApiRootId(String);

impl ApiRootId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ApiRootId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "api:{}", self.0)
    }
}

/// A version stage as reported by a registry, before any parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageRecord {
    /// Stage name; `None` when the registry could not read it.
    #[serde(default)]
    pub name: Option<String>,

    /// Value of the stage's version tag; `None` when absent or unreadable.
    #[serde(default)]
    pub version_tag: Option<String>,
}

impl StageRecord {
    pub fn new(name: impl Into<String>, version_tag: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            version_tag: Some(version_tag.into()),
        }
    }

    /// A stage carrying the same name as its version tag.
    pub fn versioned(tag: impl Into<String>) -> Self {
        let tag = tag.into();
        Self::new(tag.clone(), tag)
    }
}

/// One currently provisioned version stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployedVersion {
    /// Stage identifier.
    pub identifier: Option<String>,

    /// Original tag value.
    pub raw: Option<String>,

    /// Parsed tag, if it could be read.
    pub token: Option<VersionToken>,
}

impl DeployedVersion {
    /// Build from a registry record, parsing the tag leniently.
    pub fn from_record(record: StageRecord, comparator: &VersionComparator) -> Self {
        let token = record
            .version_tag
            .as_deref()
            .and_then(|raw| comparator.parse_tag(raw).ok());

        Self {
            identifier: record.name.filter(|n| !n.trim().is_empty()),
            raw: record.version_tag,
            token,
        }
    }

    /// Whether the version tag was readable.
    pub fn present(&self) -> bool {
        self.token.is_some()
    }

    pub fn is_identified(&self) -> bool {
        self.identifier.is_some()
    }

    /// Identifier or tag, whichever is readable, for log lines.
    pub fn label(&self) -> &str {
        self.raw
            .as_deref()
            .or(self.identifier.as_deref())
            .unwrap_or("<unknown>")
    }
}
