//! Configuration file support for manga-stitch
//!
//! Supports TOML configuration files with the following search order:
//! 1. `--config <path>` - explicitly specified path
//! 2. `./manga-stitch.toml` - current directory
//! 3. `~/.config/manga-stitch/config.toml` - user config
//! 4. Default values
//!
//! # Example Configuration
//!
//! ```toml
//! [metadata]
//! title = "My Series Chapter"
//! series = "My Series"
//!
//! [scan]
//! recursive = true
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::cli::Cli;

/// Configuration file errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error reading config file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// File not found
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),
}

/// Chapter metadata overrides
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MetadataConfig {
    /// Title override for stitched chapters
    #[serde(default)]
    pub title: Option<String>,

    /// Series override for stitched chapters
    #[serde(default)]
    pub series: Option<String>,
}

/// Directory scan settings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ScanConfig {
    /// Search the directory recursively
    #[serde(default)]
    pub recursive: Option<bool>,
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Metadata settings
    #[serde(default)]
    pub metadata: MetadataConfig,

    /// Scan settings
    #[serde(default)]
    pub scan: ScanConfig,
}

/// Effective settings for one run, after merging file config and CLI.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    pub recursive: bool,
    pub title: Option<String>,
    pub series: Option<String>,
}

impl Config {
    /// Load configuration from the default search path
    ///
    /// Search order:
    /// 1. `./manga-stitch.toml`
    /// 2. `~/.config/manga-stitch/config.toml`
    /// 3. Default values (if no file found)
    pub fn load() -> Result<Self, ConfigError> {
        let current_dir_config = PathBuf::from("manga-stitch.toml");
        if current_dir_config.exists() {
            return Self::load_from_path(&current_dir_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("manga-stitch").join("config.toml");
            if user_config.exists() {
                return Self::load_from_path(&user_config);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file path
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Merge file configuration with CLI arguments; CLI takes precedence.
    pub fn merge_with_cli(&self, cli: &Cli) -> RunSettings {
        RunSettings {
            recursive: cli.recursive || self.scan.recursive.unwrap_or(false),
            title: cli.title.clone().or_else(|| self.metadata.title.clone()),
            series: cli.series.clone().or_else(|| self.metadata.series.clone()),
        }
    }
}
