//! Configuration handling for scriptkit
//!
//! Configuration is stored in `<anchor>/scriptkit.toml` (anchor) and
//! `~/.config/scriptkit/config.toml` (global).

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{Color, Console, Severity};

/// File name of the anchor-level configuration
pub const ANCHOR_CONFIG_FILE: &str = "scriptkit.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read configuration {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse configuration {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Output format for commands
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Settings for the tee logger
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LogConfig {
    /// Log file name inside the anchor directory
    pub file: String,

    /// Tag colour for regular records
    pub color: Color,

    /// Tag colour for warnings
    pub warn_color: Color,

    /// Console stream records are mirrored to
    pub console: Console,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file: "log.txt".to_string(),
            color: Color::green(),
            warn_color: Color::yellow(),
            console: Console::Stdout,
        }
    }
}

impl LogConfig {
    /// Default colour for a severity
    pub fn color_for(&self, severity: Severity) -> &Color {
        match severity {
            Severity::Info => &self.color,
            Severity::Warn => &self.warn_color,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let file = Path::new(&self.file);
        if self.file.is_empty() || file.components().count() != 1 || file.is_absolute() {
            return Err(ConfigError::Invalid(format!(
                "log.file must be a plain file name, got {:?}",
                self.file
            )));
        }
        Ok(())
    }
}

/// Anchor-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct AnchorConfig {
    /// Logger settings
    pub log: LogConfig,
}

/// Global user configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct GlobalConfig {
    /// Default output format (text or json)
    pub default_format: OutputFormat,
}

/// Combined configuration (global + anchor)
#[derive(Debug, Clone, Default, Serialize)]
pub struct Config {
    pub anchor: AnchorConfig,
    pub global: GlobalConfig,
    #[serde(skip)]
    pub anchor_root: Option<PathBuf>,
}

impl Config {
    /// Loads configuration for a specific anchor directory
    pub fn for_anchor(anchor_root: &Path) -> Result<Self, ConfigError> {
        let global = Self::load_global()?;
        let anchor = Self::load_anchor_config(anchor_root)?;

        Ok(Self {
            anchor,
            global,
            anchor_root: Some(anchor_root.to_path_buf()),
        })
    }

    /// Returns the global config directory
    pub fn global_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "scriptkit", "scriptkit")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Loads global configuration
    fn load_global() -> Result<GlobalConfig, ConfigError> {
        match Self::global_config_dir() {
            Some(dir) => Self::read_toml(&dir.join("config.toml")),
            None => Ok(GlobalConfig::default()),
        }
    }

    /// Loads anchor configuration, validating it
    fn load_anchor_config(anchor_root: &Path) -> Result<AnchorConfig, ConfigError> {
        let config: AnchorConfig = Self::read_toml(&anchor_root.join(ANCHOR_CONFIG_FILE))?;
        config.log.validate()?;
        Ok(config)
    }

    /// Reads a TOML file, falling back to defaults when it is absent
    fn read_toml<T>(path: &Path) -> Result<T, ConfigError>
    where
        T: Default + for<'de> Deserialize<'de>,
    {
        if !path.exists() {
            return Ok(T::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Logger settings in effect
    pub fn log(&self) -> &LogConfig {
        &self.anchor.log
    }
}
