//! Configuration loading and management
//!
//! ```yaml
//! backend:
//!   url: https://project.example.co
//!   api_key: public-anon-key
//!   table: shirts
//!   timeout_secs: 10
//! server:
//!   bind: 0.0.0.0:3000
//! ```

use crate::core::error::InventoryResult;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Hosted table backend settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Project endpoint, without the `/rest/v1` suffix
    #[serde(default)]
    pub url: String,

    /// Access key sent as `apikey` and bearer token
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_table")]
    pub table: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_table() -> String {
    "shirts".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: String::new(),
            table: default_table(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl BackendConfig {
    /// Both endpoint and key are present and non-blank
    pub fn is_configured(&self) -> bool {
        !self.url.trim().is_empty() && !self.api_key.trim().is_empty()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// HTTP server settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String {
    "127.0.0.1:3000".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

/// Complete service configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventoryConfig {
    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

impl InventoryConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> InventoryResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> InventoryResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Load from `path`, falling back to defaults when the file does not exist
    ///
    /// A missing file leaves the backend unconfigured rather than aborting,
    /// so the service can still report what is missing.
    pub fn load_or_default(path: impl AsRef<Path>) -> InventoryResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::warn!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }
        Self::from_yaml_file(path)
    }
}
