//! Configuration store for the annotator.
//!
//! The store owns the selected timestamp format and its persistence; the
//! annotator core only ever sees the string value and an explicit change
//! callback. Change deduplication lives here as well, in [`FormatWatch`].

use crate::format::TimestampFormat;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Persistent configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Name of the selected timestamp format.
    ///
    /// Kept as a raw string so an unrecognized value still loads and is
    /// reported by the formatter at annotation time instead of failing
    /// here.
    pub timestamp_format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timestamp_format: TimestampFormat::None.as_str().to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .map_err(|e| ConfigError::IoError(e.to_string()))?;
            let config: Config = serde_json::from_str(&content)
                .map_err(|e| ConfigError::ParseError(e.to_string()))?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        let config_path = Self::config_path();

        // Ensure parent directory exists
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(&config_path, content).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// Get the path to the configuration file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("serial-timestamp")
            .join("config.json")
    }
}

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    IoError(String),
    ParseError(String),
    SerializeError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {e}"),
            ConfigError::ParseError(e) => write!(f, "Parse error: {e}"),
            ConfigError::SerializeError(e) => write!(f, "Serialize error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Distinct-until-changed guard for the selected format.
///
/// The configuration owner runs every observed value through this watch
/// and only invokes the annotator's change callback when `observe`
/// returns `Some`, so adjacent duplicate values never re-trigger a
/// forced re-stamp.
#[derive(Debug, Clone)]
pub struct FormatWatch {
    current: String,
}

impl FormatWatch {
    /// Create a watch seeded with the initially selected value.
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            current: initial.into(),
        }
    }

    /// The last observed value.
    pub fn current(&self) -> &str {
        &self.current
    }

    /// Observe a value; returns it only on a genuine transition.
    pub fn observe(&mut self, value: &str) -> Option<String> {
        if value == self.current {
            return None;
        }
        self.current = value.to_string();
        Some(self.current.clone())
    }
}
