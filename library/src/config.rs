//! Engine configuration, read from TOML.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::LibraryError;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct EngineConfig {
    pub log: LogConfig,
    pub registry: RegistryConfig,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LogConfig {
    /// Default `env_logger` filter; `RUST_LOG` takes precedence.
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct RegistryConfig {
    /// Plugin ids that are not registered at startup.
    pub disabled_plugins: Vec<String>,
}

impl EngineConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, LibraryError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LibraryError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    pub fn to_toml_string(&self) -> Result<String, LibraryError> {
        toml::to_string_pretty(self).map_err(|e| LibraryError::Runtime(e.to_string()))
    }
}
