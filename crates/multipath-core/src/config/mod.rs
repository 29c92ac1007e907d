//! Configuration management for multipath.
//!
//! Configuration is loaded from the platform config directory with defaults
//! matching the node inputs' defaults.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Loader settings
    pub loading: LoadingConfig,

    /// Resource limits
    pub limits: LimitsConfig,

    /// Save settings
    pub save: SaveConfig,

    /// Video encoder settings
    pub encoder: EncoderConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.multipath.multipath/config.toml
    /// - Linux: ~/.config/multipath/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\multipath\config\config.toml
    ///
    /// Falls back to ~/.multipath/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "multipath", "multipath")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".multipath").join("config.toml")
            })
    }

    /// Resolved upload root (with ~ expansion).
    pub fn input_dir(&self) -> PathBuf {
        expand(&self.general.input_dir)
    }

    /// Resolved default output directory (with ~ expansion).
    pub fn output_dir(&self) -> PathBuf {
        expand(&self.save.output_dir)
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

fn expand(path: &Path) -> PathBuf {
    let path_str = path.to_string_lossy();
    PathBuf::from(shellexpand::tilde(&path_str).into_owned())
}
