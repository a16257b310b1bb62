//! CLI configuration

use crate::error::{CliError, CliResult};
use serde::{Deserialize, Serialize};
use stagekeep_lifecycle::LifecycleConfig;
use std::path::PathBuf;

/// CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CliConfig {
    /// Default service name
    pub service: Option<String>,

    /// Default deployment stage
    pub stage: Option<String>,

    /// Default stage snapshot file
    pub snapshot: Option<PathBuf>,

    /// Retention and version settings
    pub lifecycle: LifecycleConfig,
}

impl CliConfig {
    /// Load configuration from file
    ///
    /// A missing file yields the default configuration.
    pub fn load(path: Option<&str>) -> CliResult<Self> {
        let config_path = match path {
            Some(p) => PathBuf::from(p),
            None => match Self::default_config_path() {
                Some(p) => p,
                None => return Ok(CliConfig::default()),
            },
        };

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)?;
            Self::from_toml_str(&contents)
        } else {
            Ok(CliConfig::default())
        }
    }

    pub fn from_toml_str(contents: &str) -> CliResult<Self> {
        toml::from_str(contents).map_err(|e| CliError::Config(e.to_string()))
    }

    /// `<config_dir>/stagekeep/config.toml`
    fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("stagekeep").join("config.toml"))
    }
}
