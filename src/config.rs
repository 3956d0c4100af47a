//! Application configuration.
//!
//! A small TOML file resolves where the task snapshot lives. Every
//! field is defaulted, so a missing file or a partially-filled one is
//! never an error.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, RitualError};

/// Directory name under the platform config/data roots.
const APP_DIR: &str = "ritual";

/// Config file name inside the config directory.
const CONFIG_FILE: &str = "config.toml";

/// Snapshot file name inside the data directory.
const DATA_FILE: &str = "tasks.json";

/// User configuration, loaded from the platform config directory.
///
/// # Example
///
/// ```
/// use ritual::config::AppConfig;
///
/// let config = AppConfig::default();
/// assert!(config.data_file.ends_with("tasks.json"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Path of the task snapshot file.
    pub data_file: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default location.
    ///
    /// A missing file yields the defaults; a present but unparsable
    /// file is a configuration error.
    pub fn load() -> Result<Self> {
        match default_config_file() {
            Some(path) if path.exists() => Self::load_from(path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from an explicit path.
    pub fn load_from(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let contents = fs::read_to_string(&path)
            .map_err(|e| RitualError::config_with_path(e.to_string(), path.clone()))?;

        let config: Self = toml::from_str(&contents)
            .map_err(|e| RitualError::config_with_path(e.to_string(), path.clone()))?;

        debug!(path = %path.display(), "config loaded");
        Ok(config)
    }
}

/// Default location of the config file, when the platform exposes one.
#[must_use]
pub fn default_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}

/// Default location of the task snapshot file.
///
/// Falls back to the current directory when the platform exposes no
/// data directory.
#[must_use]
pub fn default_data_file() -> PathBuf {
    dirs::data_dir()
        .map_or_else(|| PathBuf::from("."), |dir| dir.join(APP_DIR))
        .join(DATA_FILE)
}
