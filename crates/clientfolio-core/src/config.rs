//! Configuration for clientfolio
//!
//! Where snapshots live and how the dashboard is sized. Loaded from TOML or
//! JSON; every field has a default so an empty file is valid.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::analytics::DEFAULT_RECENT_LIMIT;
use crate::error::ConfigError;
use crate::snapshot::DEFAULT_STORAGE_KEY;

/// Application directory name under the platform data dir.
pub const APP_DIR_NAME: &str = "clientfolio";

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientfolioConfig {
    pub storage: StorageConfig,
    pub analytics: AnalyticsConfig,
}

/// Snapshot storage settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding snapshot files; platform data dir when unset
    pub data_dir: Option<PathBuf>,
    /// Key the folder collection is stored under
    pub key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

/// Dashboard settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// How many entries the recent-clients list shows
    pub recent_limit: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            recent_limit: DEFAULT_RECENT_LIMIT,
        }
    }
}

impl ClientfolioConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn from_json(json_str: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json_str).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load from a file, picking the format by extension (`.json` or TOML).
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&contents)?,
            _ => Self::from_toml(&contents)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Resolved snapshot directory.
    pub fn data_dir(&self) -> PathBuf {
        self.storage
            .data_dir
            .clone()
            .or_else(|| dirs::data_local_dir().map(|d| d.join(APP_DIR_NAME)))
            .unwrap_or_else(|| PathBuf::from(format!(".{}", APP_DIR_NAME)))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let key = self.storage.key.trim();
        if key.is_empty() {
            return Err(ConfigError::Invalid("storage.key must not be empty".into()));
        }
        if key.contains(['/', '\\']) || key == "." || key == ".." {
            return Err(ConfigError::Invalid(format!(
                "storage.key '{}' must be a plain name",
                key
            )));
        }
        if self.analytics.recent_limit == 0 {
            return Err(ConfigError::Invalid(
                "analytics.recent_limit must be positive".into(),
            ));
        }
        Ok(())
    }
}
