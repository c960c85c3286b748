//! Configuration types and loading for a registry run.
//!
//! All settings have defaults, so a run works without a configuration file.
//! A TOML file can override any subset:
//!
//! ```toml
//! [index]
//! url = "https://pypi.org/pypi"
//! parse_wheels = true
//!
//! [network]
//! fetch_timeout_secs = 60
//! check_timeout_secs = 30
//! download_timeout_secs = 120
//!
//! [output]
//! path = "plugins_metadata.json"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Package-index settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Base URL of the JSON API; `<url>/<package>/json` is requested.
    pub url: String,
    /// Download built distributions to read their entry points.
    pub parse_wheels: bool,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            url: "https://pypi.org/pypi".to_string(),
            parse_wheels: true,
        }
    }
}

/// Timeouts and client identification for outgoing requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Timeout for index records, manifests and module files.
    pub fetch_timeout_secs: u64,
    /// Timeout for documentation reachability checks.
    pub check_timeout_secs: u64,
    /// Timeout for built-distribution downloads.
    pub download_timeout_secs: u64,
    pub user_agent: String,
}

impl NetworkConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn check_timeout(&self) -> Duration {
        Duration::from_secs(self.check_timeout_secs)
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_secs: 60,
            check_timeout_secs: 30,
            download_timeout_secs: 120,
            user_agent: concat!("plugin-registry/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Where the run result is written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("plugins_metadata.json"),
        }
    }
}

/// Complete run configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub index: IndexConfig,
    pub network: NetworkConfig,
    pub output: OutputConfig,
}

impl RegistryConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content).map_err(|e| Error::InvalidConfig {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}
