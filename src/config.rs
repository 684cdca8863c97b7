//! Client configuration and credentials
//!
//! Configuration is read from a JSON file. By default the file lives in the
//! system's standard config directory; every field is optional and falls
//! back to its default.

use crate::transport::DEFAULT_TIMEOUT_SECS;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Base URL of the public catalog API
pub const DEFAULT_BASE_URL: &str = "https://api.thetvdb.com";

/// File name of the configuration inside the config directory
const CONFIG_FILE_NAME: &str = "config.json";

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to determine config directory location
    #[error("Failed to determine config directory location")]
    ConfigDirectoryNotFound,

    /// Failed to read the configuration file
    #[error("Failed to read config file {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to deserialize the configuration file
    #[error("Failed to deserialize config file {path}: {source}")]
    DeserializationFailed {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Source of the API key used to log in to the catalog.
pub trait Credentials {
    /// The API key sent with the login request
    fn api_key(&self) -> &str;
}

/// A plain API key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }
}

impl Credentials for ApiKey {
    fn api_key(&self) -> &str {
        &self.0
    }
}

/// Settings for talking to the catalog service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL every endpoint path is appended to
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// API key used for login, if configured
    pub api_key: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            api_key: None,
        }
    }
}

impl ClientConfig {
    /// Loads the configuration from the default location
    ///
    /// The file is looked up in the system's standard config directory,
    /// e.g. `~/.config/episode_catalog/config.json` on Linux.
    ///
    /// A missing file is not an error; defaults are returned instead.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::default_path()?)
    }

    /// Loads the configuration from `path`, returning defaults if it does
    /// not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Self =
            serde_json::from_str(&content).map_err(|e| ConfigError::DeserializationFailed {
                path: path.to_path_buf(),
                source: e,
            })?;

        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Returns the path of the default configuration file
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let proj_dirs = directories::ProjectDirs::from("", "", "episode_catalog")
            .ok_or(ConfigError::ConfigDirectoryNotFound)?;

        Ok(proj_dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// The per-request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The configured API key, if there is one
    pub fn credentials(&self) -> Option<ApiKey> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(ApiKey::new)
    }
}
