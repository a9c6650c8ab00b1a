//! Configuration management for flightregistry.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::document::{JsonStyle, DEFAULT_INDENT};
use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "flightregistry";

/// Default flights document file name.
const FLIGHTS_FILE_NAME: &str = "flights.json";

/// Largest accepted indentation width.
const MAX_INDENT: usize = 16;

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `FLIGHTREGISTRY_`)
/// 2. TOML config file at `~/.config/flightregistry/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Data file configuration.
    pub data: DataConfig,
    /// JSON output configuration.
    pub output: OutputConfig,
}

/// Where flights are loaded from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Path to the flights document.
    /// Defaults to `~/.local/share/flightregistry/flights.json`
    pub flights_path: Option<PathBuf>,
}

/// How exported documents are laid out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Indent JSON output.
    pub pretty: bool,
    /// Spaces per indentation level when `pretty` is set.
    pub indent: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty: true,
            indent: DEFAULT_INDENT,
        }
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
    /// Configuration is loaded in this order (later sources override earlier):
    /// 1. Default values
    /// 2. TOML config file (if exists)
    /// 3. Environment variables (e.g. `FLIGHTREGISTRY_OUTPUT__INDENT=4`)
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("FLIGHTREGISTRY_").split("__"));

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
        if self.output.pretty && !(1..=MAX_INDENT).contains(&self.output.indent) {
            return Err(Error::ConfigValidation {
                message: format!(
                    "output.indent must be between 1 and {MAX_INDENT}, got {}",
                    self.output.indent
                ),
            });
        }

        if let Some(path) = &self.data.flights_path {
            if path.as_os_str().is_empty() {
                return Err(Error::ConfigValidation {
                    message: "data.flights_path must not be empty".to_string(),
                });
            }
        }

        Ok(())
    }

    /// Get the flights document path, resolving defaults if not set.
    #[must_use]
    pub fn flights_path(&self) -> PathBuf {
        self.data
            .flights_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(FLIGHTS_FILE_NAME))
    }

    /// Get the configured JSON layout.
    #[must_use]
    pub fn json_style(&self) -> JsonStyle {
        if self.output.pretty {
            JsonStyle::Pretty {
                indent: self.output.indent,
            }
        } else {
            JsonStyle::Compact
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!(config.data.flights_path.is_none());
        assert!(config.output.pretty);
        assert_eq!(config.output.indent, 2);
    }

    #[test]
    fn test_validate_valid_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_indent() {
        let mut config = Config::default();
        config.output.indent = 0;

        let result = config.validate();
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("output.indent"));
    }

    #[test]
    fn test_validate_indent_ignored_when_compact() {
        let mut config = Config::default();
        config.output.pretty = false;
        config.output.indent = 0;

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_flights_path() {
        let mut config = Config::default();
        config.data.flights_path = Some(PathBuf::new());

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("flights_path"));
    }

    #[test]
    fn test_flights_path_default() {
        let config = Config::default();
        let path = config.flights_path();

        assert!(path.to_string_lossy().contains("flightregistry"));
        assert!(path.to_string_lossy().ends_with("flights.json"));
    }

    #[test]
    fn test_flights_path_custom() {
        let mut config = Config::default();
        config.data.flights_path = Some(PathBuf::from("/srv/schedule.json"));

        assert_eq!(config.flights_path(), PathBuf::from("/srv/schedule.json"));
    }

    #[test]
    fn test_json_style() {
        let mut config = Config::default();
        assert_eq!(config.json_style(), JsonStyle::Pretty { indent: 2 });

        config.output.indent = 4;
        assert_eq!(config.json_style(), JsonStyle::Pretty { indent: 4 });

        config.output.pretty = false;
        assert_eq!(config.json_style(), JsonStyle::Compact);
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("flightregistry"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        // Loading from a nonexistent path should work (uses defaults)
        let result = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml")));
        assert!(result.is_ok());

        let config = result.unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_from_toml_file() {
        let path = std::env::temp_dir().join(format!(
            "flightregistry_config_{}.toml",
            std::process::id()
        ));
        std::fs::write(
            &path,
            "[data]\nflights_path = \"/srv/flights.json\"\n\n[output]\npretty = false\n",
        )
        .unwrap();

        let config = Config::load_from(Some(path.clone())).unwrap();
        assert_eq!(config.flights_path(), PathBuf::from("/srv/flights.json"));
        assert_eq!(config.json_style(), JsonStyle::Compact);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_invalid_toml_value() {
        let path = std::env::temp_dir().join(format!(
            "flightregistry_bad_config_{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, "[output]\nindent = 64\n").unwrap();

        let err = Config::load_from(Some(path.clone())).unwrap_err();
        assert!(matches!(err, Error::ConfigValidation { .. }));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_output_config_deserialize() {
        let json = r#"{"indent": 8}"#;
        let output: OutputConfig = serde_json::from_str(json).unwrap();
        assert!(output.pretty);
        assert_eq!(output.indent, 8);
    }

    #[test]
    fn test_config_serialize() {
        let json = serde_json::to_string(&Config::default()).unwrap();
        assert!(json.contains("flights_path"));
        assert!(json.contains("indent"));
    }
}
