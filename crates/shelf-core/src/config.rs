use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use shelf_util::errors::ShelfError;

/// Where the published remote index is fetched from unless configured otherwise.
pub const DEFAULT_INDEX_URL: &str =
    "https://raw.githubusercontent.com/shelf-pm/index/main/remote_index.json";

/// Staleness threshold for the remote index, in hours.
pub const DEFAULT_REFRESH_HOURS: u64 = 4;

/// Global user configuration loaded from `<config dir>/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub index: IndexConfig,

    #[serde(default)]
    pub install: InstallConfig,
}

/// Remote index settings from `[index]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    #[serde(default = "default_index_url")]
    pub url: String,
    #[serde(default = "default_refresh_hours", rename = "refresh-hours")]
    pub refresh_hours: u64,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            url: default_index_url(),
            refresh_hours: default_refresh_hours(),
        }
    }
}

impl IndexConfig {
    /// Age after which the local copy of the remote index is refreshed.
    pub fn max_age(&self) -> Duration {
        Duration::from_secs(self.refresh_hours.saturating_mul(3600))
    }
}

fn default_index_url() -> String {
    DEFAULT_INDEX_URL.to_string()
}

fn default_refresh_hours() -> u64 {
    DEFAULT_REFRESH_HOURS
}

/// Installation settings from `[install]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallConfig {
    #[serde(default = "default_jobs")]
    pub jobs: usize,
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self { jobs: default_jobs() }
    }
}

fn default_jobs() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

impl GlobalConfig {
    /// Load the configuration from the default location, or return defaults if the file doesn't exist.
    pub fn load() -> Result<Self, ShelfError> {
        Self::load_from(&Self::default_path())
    }

    /// Load the configuration from `path`, or return defaults if the file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self, ShelfError> {
        if !path.is_file() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| ShelfError::Config {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        Self::parse_toml(&content)
    }

    pub fn parse_toml(content: &str) -> Result<Self, ShelfError> {
        let config: GlobalConfig = toml::from_str(content).map_err(|e| ShelfError::Config {
            message: format!("Failed to parse config: {e}"),
        })?;
        if config.install.jobs == 0 {
            return Err(ShelfError::Config {
                message: "`install.jobs` must be at least 1".to_string(),
            });
        }
        Ok(config)
    }

    /// `<config dir>/config.toml`.
    pub fn default_path() -> PathBuf {
        shelf_util::dirs::config_dir().join("config.toml")
    }
}
