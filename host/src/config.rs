//! Configuration management
//!
//! This module handles loading, validation, and management of the host
//! configuration. Configuration is stored in TOML format at
//! ~/.synapse/config.toml.
//!
//! # Configuration Sections
//!
//! - **host**: log level, extension directory
//! - **registry**: duplicate-alias policy
//!
//! # Path Expansion
//!
//! The configuration system expands `~` to the user's home directory for
//! the extension directory, so manifests can be shipped with portable
//! paths.
//!
//! # Examples
//!
//! ```no_run
//! use synapse_host::config::Config;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load_or_create()?;
//! println!("Extensions: {:?}", config.host.extension_dir);
//! # Ok(())
//! # }
//! ```

use sdk::errors::HostError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::registry::DuplicatePolicy;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Host settings
    pub host: HostConfig,

    /// Module registry settings
    #[serde(default)]
    pub registry: RegistryConfig,
}

/// Host configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Directory extension libraries are resolved against (supports ~ expansion)
    #[serde(default = "default_extension_dir")]
    pub extension_dir: PathBuf,
}

/// Module registry configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// What to do when an alias path is already bound to a different module
    #[serde(default)]
    pub duplicate_alias: DuplicatePolicy,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_extension_dir() -> PathBuf {
    PathBuf::from("~/.synapse/extensions")
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            extension_dir: default_extension_dir(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: HostConfig::default(),
            registry: RegistryConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default location (~/.synapse/config.toml)
    ///
    /// If the configuration file doesn't exist, creates a default
    /// configuration and saves it there.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or written, TOML parsing
    /// fails, or validation fails.
    pub fn load_or_create() -> Result<Self, HostError> {
        let config_path = Self::default_config_path()?;

        if config_path.exists() {
            Self::load_from_path(&config_path)
        } else {
            Self::create_default(&config_path)
        }
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self, HostError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| HostError::Config(format!("Failed to read config file: {e}")))?;

        let mut config: Config = toml::from_str(&contents)
            .map_err(|e| HostError::Config(format!("Failed to parse config: {e}")))?;

        config.validate_and_process()?;

        Ok(config)
    }

    /// Create a default configuration and save it to `path`
    pub fn create_default(path: &Path) -> Result<Self, HostError> {
        let mut config = Config::default();
        config.validate_and_process()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| HostError::Config(format!("Failed to create config dir: {e}")))?;
        }
        let contents = toml::to_string_pretty(&config)
            .map_err(|e| HostError::Config(format!("Failed to serialize config: {e}")))?;
        fs::write(path, contents)
            .map_err(|e| HostError::Config(format!("Failed to write config file: {e}")))?;

        tracing::info!("Created default configuration at {}", path.display());
        Ok(config)
    }

    /// Default configuration file location
    fn default_config_path() -> Result<PathBuf, HostError> {
        let home = dirs::home_dir()
            .ok_or_else(|| HostError::Config("Could not determine home directory".to_string()))?;
        Ok(home.join(".synapse").join("config.toml"))
    }

    /// Validate values and expand paths
    fn validate_and_process(&mut self) -> Result<(), HostError> {
        const LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];
        if !LEVELS.contains(&self.host.log_level.as_str()) {
            return Err(HostError::Config(format!(
                "Invalid log level '{}', expected one of: {}",
                self.host.log_level,
                LEVELS.join(", ")
            )));
        }

        self.host.extension_dir = expand_path(&self.host.extension_dir)?;
        Ok(())
    }
}

/// Expand a leading `~` to the user's home directory
fn expand_path(path: &Path) -> Result<PathBuf, HostError> {
    let Ok(stripped) = path.strip_prefix("~") else {
        return Ok(path.to_path_buf());
    };
    let home = dirs::home_dir()
        .ok_or_else(|| HostError::Config("Could not determine home directory".to_string()))?;
    Ok(home.join(stripped))
}
