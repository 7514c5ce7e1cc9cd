#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for maid
//!
//! This crate handles loading and merging configuration from:
//! - Default values (hard-coded)
//! - Configuration file (~/.config/maid/config.toml)
//! - Environment variables

pub mod constants;

use maid_errors::{ConfigError, Error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub paths: PathConfig,

    #[serde(default)]
    pub state: StateConfig,

    #[serde(default)]
    pub tracker: TrackerConfig,
}

/// Path configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PathConfig {
    pub storage_root: Option<PathBuf>,
    pub db_path: Option<PathBuf>,
}

/// Record database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateConfig {
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_busy_timeout_secs")]
    pub busy_timeout_secs: u64,
}

/// Orphan file tracker configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TrackerConfig {
    #[serde(default)]
    pub missing_previous: MissingPreviousPolicy,
    #[serde(default)]
    pub tracked: Vec<TrackedEntity>,
}

/// One `[[tracker.tracked]]` entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrackedEntity {
    pub entity: String,
    /// `None` tracks every file field of the entity
    #[serde(default)]
    pub fields: Option<Vec<String>>,
}

/// What an update does when the record it replaces is no longer persisted
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MissingPreviousPolicy {
    /// Warn and skip cleanup for that save
    #[default]
    Ignore,
    /// Abort the save with `StateError::RecordNotFound`
    Fail,
}

impl std::str::FromStr for MissingPreviousPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ignore" => Ok(Self::Ignore),
            "fail" => Ok(Self::Fail),
            _ => Err(ConfigError::InvalidValue {
                field: "missing_previous".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            max_connections: 5,
            busy_timeout_secs: 30,
        }
    }
}

fn default_max_connections() -> u32 {
    5
}

fn default_busy_timeout_secs() -> u64 {
    30
}

impl StateConfig {
    /// Busy timeout as a `Duration`
    #[must_use]
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_secs(self.busy_timeout_secs)
    }
}

impl Config {
    /// Get the default config file path
    ///
    /// # Errors
    ///
    /// Returns an error if the system config directory cannot be determined.
    pub fn default_path() -> Result<PathBuf, Error> {
        let config_dir = dirs::config_dir().ok_or_else(|| ConfigError::NotFound {
            path: "config directory".to_string(),
        })?;
        Ok(config_dir.join("maid").join(constants::CONFIG_FILE))
    }

    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the file contents
    /// contain invalid TOML syntax that cannot be parsed.
    pub async fn load_from_file(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)
            .await
            .map_err(|_| ConfigError::NotFound {
                path: path.display().to_string(),
            })?;

        toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError {
                message: e.to_string(),
            })
            .map_err(Into::into)
    }

    /// Load configuration with fallback to defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read
    /// or contains invalid TOML syntax.
    pub async fn load() -> Result<Self, Error> {
        let config_path = Self::default_path()?;

        if config_path.exists() {
            Self::load_from_file(&config_path).await
        } else {
            tracing::debug!(path = %config_path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration from an optional path or use default
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(config_path) => Self::load_from_file(config_path).await,
            None => Self::load().await,
        }
    }

    /// Merge with environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values
    /// that cannot be parsed into the expected types.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        // MAID_STORAGE_ROOT
        if let Ok(root) = std::env::var("MAID_STORAGE_ROOT") {
            self.paths.storage_root = Some(PathBuf::from(root));
        }

        // MAID_DB_PATH
        if let Ok(db) = std::env::var("MAID_DB_PATH") {
            self.paths.db_path = Some(PathBuf::from(db));
        }

        // MAID_MAX_CONNECTIONS
        if let Ok(max) = std::env::var("MAID_MAX_CONNECTIONS") {
            self.state.max_connections = max.parse().map_err(|_| ConfigError::InvalidValue {
                field: "MAID_MAX_CONNECTIONS".to_string(),
                value: max,
            })?;
        }

        // MAID_MISSING_PREVIOUS
        if let Ok(policy) = std::env::var("MAID_MISSING_PREVIOUS") {
            self.tracker.missing_previous =
                policy.parse().map_err(|_| ConfigError::InvalidValue {
                    field: "MAID_MISSING_PREVIOUS".to_string(),
                    value: policy,
                })?;
        }

        Ok(())
    }

    /// Get the storage root (with default)
    #[must_use]
    pub fn storage_root(&self) -> PathBuf {
        self.paths
            .storage_root
            .clone()
            .unwrap_or_else(|| PathBuf::from(constants::STORAGE_ROOT))
    }

    /// Get the database path (with default)
    #[must_use]
    pub fn db_path(&self) -> PathBuf {
        self.paths
            .db_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(constants::DB_PATH))
    }
}
