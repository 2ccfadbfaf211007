//! Configuration loading and typed config structures for match playback.
//!
//! The configuration lives in `playback-config.yaml`. This module defines
//! strongly-typed structs that mirror the YAML structure and a loader that
//! reads the file. Every field has a default, so an empty file (or no file)
//! yields a working configuration.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level playback configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PlaybackConfig {
    /// Replay engine settings.
    #[serde(default)]
    pub playback: ReplaySettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl PlaybackConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        Ok(config)
    }
}

/// Replay engine settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ReplaySettings {
    /// Rounds a decoded action stays in the live action list.
    #[serde(default = "default_action_lifetime")]
    pub default_action_lifetime: u32,

    /// Statistics aggregation slower than this is logged as a warning.
    #[serde(default = "default_slow_stat_threshold_ms")]
    pub slow_stat_threshold_ms: u64,
}

impl ReplaySettings {
    /// Lifetime given to new actions, never below one round.
    pub const fn action_lifetime(&self) -> u32 {
        if self.default_action_lifetime == 0 {
            1
        } else {
            self.default_action_lifetime
        }
    }

    /// The slow-aggregation threshold as a [`Duration`].
    pub const fn slow_stat_threshold(&self) -> Duration {
        Duration::from_millis(self.slow_stat_threshold_ms)
    }
}

impl Default for ReplaySettings {
    fn default() -> Self {
        Self {
            default_action_lifetime: default_action_lifetime(),
            slow_stat_threshold_ms: default_slow_stat_threshold_ms(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes
    /// precedence when set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

const fn default_action_lifetime() -> u32 {
    1
}

const fn default_slow_stat_threshold_ms() -> u64 {
    1
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = PlaybackConfig::default();
        assert_eq!(config.playback.default_action_lifetime, 1);
        assert_eq!(config.playback.slow_stat_threshold(), Duration::from_millis(1));
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json);
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r"
playback:
  default_action_lifetime: 3
  slow_stat_threshold_ms: 25
logging:
  level: debug
  json: true
";
        let config = PlaybackConfig::parse(yaml).unwrap();
        assert_eq!(config.playback.action_lifetime(), 3);
        assert_eq!(config.playback.slow_stat_threshold_ms, 25);
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);
    }

    #[test]
    fn partial_yaml_uses_defaults() {
        let config = PlaybackConfig::parse("logging:\n  level: warn\n").unwrap();
        assert_eq!(config.playback, ReplaySettings::default());
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn zero_lifetime_is_clamped() {
        let settings = ReplaySettings {
            default_action_lifetime: 0,
            slow_stat_threshold_ms: 1,
        };
        assert_eq!(settings.action_lifetime(), 1);
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        let result = PlaybackConfig::parse("playback: [not, a, map]");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = PlaybackConfig::from_file(Path::new("/nonexistent/playback-config.yaml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
