//! Configuration loading and config file resolution
//!
//! Configuration is optional. A missing file means compiled defaults; a file
//! that exists but cannot be read or parsed is an error.

use crate::{Error, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable naming a config file
pub const CONFIG_ENV_VAR: &str = "DNAETL_CONFIG";

/// Configuration loaded from TOML file
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct TomlConfig {
    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Metadata filter thresholds (optional)
    #[serde(default)]
    pub filter: FilterConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Metadata filter thresholds
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct FilterConfig {
    /// Minimum participant age in whole years
    #[serde(default = "default_min_age")]
    pub min_age: u32,

    /// Maximum character length of any string value in the metadata
    #[serde(default = "default_max_string_length")]
    pub max_string_length: usize,

    /// First accepted date (inclusive), written as a quoted `YYYY-MM-DD` string
    #[serde(default = "default_date_range_start")]
    pub date_range_start: NaiveDate,

    /// Last accepted date (inclusive)
    #[serde(default = "default_date_range_end")]
    pub date_range_end: NaiveDate,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            min_age: default_min_age(),
            max_string_length: default_max_string_length(),
            date_range_start: default_date_range_start(),
            date_range_end: default_date_range_end(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_min_age() -> u32 {
    40
}

fn default_max_string_length() -> usize {
    64
}

fn default_date_range_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2014, 1, 1).unwrap_or(NaiveDate::MIN)
}

fn default_date_range_end() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 12, 31).unwrap_or(NaiveDate::MAX)
}

/// Config file resolution in priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. User config file (`<config dir>/dnaetl/config.toml`) if it exists
/// 4. None (compiled defaults)
pub fn resolve_config_path(cli_arg: Option<&Path>, env_var_name: &str) -> Option<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    // Priority 3: User config file
    dirs::config_dir()
        .map(|d| d.join("dnaetl").join("config.toml"))
        .filter(|p| p.is_file())
}

/// Load configuration from an optional path
///
/// `None` yields compiled defaults.
pub fn load_config(path: Option<&Path>) -> Result<TomlConfig> {
    let Some(path) = path else {
        debug!("No config file, using compiled defaults");
        return Ok(TomlConfig::default());
    };

    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Cannot read config file {}: {}", path.display(), e))
    })?;
    let config = parse_config(&content)
        .map_err(|e| Error::Config(format!("{} ({})", e, path.display())))?;

    info!("Loaded config from {}", path.display());
    Ok(config)
}

/// Parse configuration from TOML text
pub fn parse_config(content: &str) -> Result<TomlConfig> {
    let config: TomlConfig =
        toml::from_str(content).map_err(|e| Error::Config(format!("Invalid TOML: {}", e)))?;

    if config.filter.date_range_start > config.filter.date_range_end {
        return Err(Error::Config(format!(
            "date_range_start {} is after date_range_end {}",
            config.filter.date_range_start, config.filter.date_range_end
        )));
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_filter_constants() {
        let config = TomlConfig::default();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.filter.min_age, 40);
        assert_eq!(config.filter.max_string_length, 64);
        assert_eq!(config.filter.date_range_start.to_string(), "2014-01-01");
        assert_eq!(config.filter.date_range_end.to_string(), "2024-12-31");
    }

    #[test]
    fn test_parse_empty_uses_defaults() {
        assert_eq!(parse_config("").unwrap(), TomlConfig::default());
    }

    #[test]
    fn test_parse_partial_filter_section() {
        let config = parse_config("[filter]\nmin_age = 18\n").unwrap();
        assert_eq!(config.filter.min_age, 18);
        assert_eq!(config.filter.max_string_length, 64);
    }

    #[test]
    fn test_parse_rejects_inverted_range() {
        let err = parse_config(
            "[filter]\ndate_range_start = \"2024-01-01\"\ndate_range_end = \"2020-01-01\"\n",
        )
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_load_none_is_default() {
        assert_eq!(load_config(None).unwrap(), TomlConfig::default());
    }
}
