//! # Configuration Management Module
//!
//! Centralized configuration for the tracker with validation, defaults, and
//! persistence in TOML.
//!
//! ## Configuration Structure
//!
//! - [`TrackerConfig`] - Core tracker settings (data dir, catalog path, query knobs)
//! - [`LoggingConfig`] - Logging settings
//!
//! ## Usage
//!
//! ```rust,no_run
//! use kappatrack::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml").await?;
//!     println!("Catalog: {}", config.tracker.catalog_path);
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration File Format
//!
//! ```toml
//! [tracker]
//! data_dir = "./data"
//! catalog_path = "./data/seeds/quests.json"
//! downsample_window_minutes = 60
//! rankings_limit = 50
//! confirm_window_seconds = 5
//!
//! [logging]
//! level = "info"
//! file = "kappatrack.log"
//! ```

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub tracker: TrackerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Directory holding the sled progress store.
    pub data_dir: String,
    /// Path to the quest catalog JSON seed file.
    pub catalog_path: String,
    /// Chart downsampling window. Consecutive completion points inside this
    /// window collapse to their most recent value.
    #[serde(default = "default_downsample_window_minutes")]
    pub downsample_window_minutes: i64,
    /// Default cap on rankings queries.
    #[serde(default = "default_rankings_limit")]
    pub rankings_limit: usize,
    /// How long a destructive action stays armed awaiting a second confirm.
    #[serde(default = "default_confirm_window_seconds")]
    pub confirm_window_seconds: i64,
}

fn default_downsample_window_minutes() -> i64 {
    60
}

fn default_rankings_limit() -> usize {
    50
}

fn default_confirm_window_seconds() -> i64 {
    5
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            tracker: TrackerConfig {
                data_dir: "./data".to_string(),
                catalog_path: "./data/seeds/quests.json".to_string(),
                downsample_window_minutes: default_downsample_window_minutes(),
                rankings_limit: default_rankings_limit(),
                confirm_window_seconds: default_confirm_window_seconds(),
            },
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file and validate it.
    pub async fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path, e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path, e))?;

        config.validate()?;
        Ok(config)
    }

    /// Create a default configuration file
    pub async fn create_default(path: &str) -> Result<()> {
        let config = Config::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;

        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path, e))?;

        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.tracker.data_dir.trim().is_empty() {
            return Err(anyhow!("tracker.data_dir must not be empty"));
        }
        if self.tracker.catalog_path.trim().is_empty() {
            return Err(anyhow!("tracker.catalog_path must not be empty"));
        }
        if self.tracker.downsample_window_minutes <= 0 {
            return Err(anyhow!("tracker.downsample_window_minutes must be > 0"));
        }
        if self.tracker.confirm_window_seconds <= 0 {
            return Err(anyhow!("tracker.confirm_window_seconds must be > 0"));
        }
        if self.tracker.rankings_limit == 0 {
            return Err(anyhow!("tracker.rankings_limit must be > 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = Config::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.tracker.downsample_window_minutes, 60);
        assert_eq!(parsed.logging.level, "info");
    }

    #[test]
    fn zero_window_is_rejected() {
        let mut config = Config::default();
        config.tracker.downsample_window_minutes = 0;
        assert!(config.validate().is_err());
    }
}
