//! Configuration management for notaryos.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "notaryos";

/// Default storage file name.
const STORAGE_FILE_NAME: &str = "storage.db";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (`NOTARYOS_<SECTION>__<KEY>`)
/// 2. TOML config file at `~/.config/notaryos/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Toast configuration.
    pub notifications: NotificationConfig,
    /// AI coach configuration.
    pub coach: CoachConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the storage file.
    /// Defaults to `~/.local/share/notaryos/storage.db`
    pub database_path: Option<PathBuf>,
}

/// Toast-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// How long a toast stays visible, in milliseconds.
    pub toast_ttl_ms: u64,
}

/// AI coach configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoachConfig {
    /// Delay before the scripted reply is appended, in milliseconds.
    pub reply_delay_ms: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self { toast_ttl_ms: 3000 }
    }
}

impl Default for CoachConfig {
    fn default() -> Self {
        Self { reply_delay_ms: 600 }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// A missing file is not an error; defaults and the environment still apply.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("NOTARYOS_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.notifications.toast_ttl_ms == 0 {
            return Err(Error::ConfigValidation {
                message: "toast_ttl_ms must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    /// Get the storage path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(STORAGE_FILE_NAME))
    }

    /// Get the toast lifetime as a Duration.
    #[must_use]
    pub fn toast_ttl(&self) -> Duration {
        Duration::from_millis(self.notifications.toast_ttl_ms)
    }

    /// Get the coach reply delay as a Duration.
    #[must_use]
    pub fn reply_delay(&self) -> Duration {
        Duration::from_millis(self.coach.reply_delay_ms)
    }
}
