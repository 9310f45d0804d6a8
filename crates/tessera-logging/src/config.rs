// ABOUTME: Configuration structures and environment variable parsing for logging
// ABOUTME: Handles log levels, output targets, and file path configuration

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::path::PathBuf;
use tracing::Level;

/// Wrapper for tracing::Level that implements Serialize/Deserialize
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogLevel(pub Level);

impl Serialize for LogLevel {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(level_name(self.0))
    }
}

impl<'de> Deserialize<'de> for LogLevel {
    fn deserialize<D>(deserializer: D) -> Result<LogLevel, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let level = parse_log_level(&s).map_err(serde::de::Error::custom)?;
        Ok(LogLevel(level))
    }
}

impl From<Level> for LogLevel {
    fn from(level: Level) -> Self {
        LogLevel(level)
    }
}

impl From<LogLevel> for Level {
    fn from(log_level: LogLevel) -> Self {
        log_level.0
    }
}

/// Main configuration structure for the logging system.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Global log level (trace, debug, info, warn, error)
    pub level: LogLevel,

    /// Per-module log level overrides, e.g. `tessera_core::bus = "trace"`
    pub module_levels: BTreeMap<String, LogLevel>,

    pub output: OutputConfig,

    pub file: FileConfig,
}

/// Configuration for different output targets.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub console: bool,
    pub file: bool,
    pub json: bool,
    /// Pretty-print console output (vs compact)
    pub pretty_console: bool,
}

/// Configuration for file logging.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Path to log file (defaults to ~/.config/tessera/tessera.log)
    pub path: PathBuf,

    /// Number of daily log files to keep
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel(Level::INFO),
            module_levels: BTreeMap::new(),
            output: OutputConfig::default(),
            file: FileConfig::default(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            console: true,
            file: true,
            json: false,
            pretty_console: false,
        }
    }
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            path: default_log_file_path(),
            max_files: 5,
        }
    }
}

impl LoggingConfig {
    /// Default configuration with environment variable overrides applied.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply environment variable overrides to this configuration.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        // TESSERA_LOG wins over RUST_LOG
        if let Ok(level_str) = env::var("TESSERA_LOG") {
            self.level = LogLevel(parse_log_level(&level_str).context("Invalid TESSERA_LOG level")?);
        } else if let Ok(directives) = env::var("RUST_LOG") {
            self.parse_rust_log(&directives)?;
        }

        if env::var("TESSERA_LOG_JSON").is_ok() {
            self.output.json = true;
        }
        if env::var("TESSERA_LOG_NO_CONSOLE").is_ok() {
            self.output.console = false;
        }
        if env::var("TESSERA_LOG_NO_FILE").is_ok() {
            self.output.file = false;
        }

        Ok(())
    }

    /// Parse a RUST_LOG style directive list, e.g. `info,tessera_core=debug`.
    pub fn parse_rust_log(&mut self, rust_log: &str) -> Result<()> {
        for directive in rust_log.split(',').map(str::trim) {
            if directive.is_empty() {
                continue;
            }

            match directive.split_once('=') {
                Some((module, level_str)) => {
                    let level = parse_log_level(level_str).with_context(|| {
                        format!("Invalid log level '{level_str}' for module '{module}'")
                    })?;
                    self.module_levels
                        .insert(module.to_string(), LogLevel(level));
                }
                None => {
                    self.level = LogLevel(
                        parse_log_level(directive)
                            .with_context(|| format!("Invalid global log level '{directive}'"))?,
                    );
                }
            }
        }
        Ok(())
    }

    /// Filter directives in `EnvFilter` syntax
    pub fn directives(&self) -> String {
        let mut directives = vec![level_name(self.level.0).to_string()];
        directives.extend(
            self.module_levels
                .iter()
                .map(|(module, level)| format!("{module}={}", level_name(level.0))),
        );
        directives.join(",")
    }
}

/// Get the default log file path: ~/.config/tessera/tessera.log
fn default_log_file_path() -> PathBuf {
    match dirs::config_dir() {
        Some(config_dir) => config_dir.join("tessera").join("tessera.log"),
        None => PathBuf::from("tessera.log"),
    }
}

fn level_name(level: Level) -> &'static str {
    match level {
        Level::TRACE => "trace",
        Level::DEBUG => "debug",
        Level::INFO => "info",
        Level::WARN => "warn",
        Level::ERROR => "error",
    }
}

/// Parse a log level string (case-insensitive).
pub fn parse_log_level(level_str: &str) -> Result<Level> {
    match level_str.trim().to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" | "warning" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => anyhow::bail!(
            "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
            level_str
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.level.0, Level::INFO);
        assert!(config.output.console);
        assert!(config.output.file);
        assert!(!config.output.json);
        assert!(config.file.path.to_string_lossy().contains("tessera.log"));
    }

    #[test]
    fn test_parse_log_level() {
        assert_eq!(parse_log_level("trace").unwrap(), Level::TRACE);
        assert_eq!(parse_log_level("DEBUG").unwrap(), Level::DEBUG);
        assert_eq!(parse_log_level("Warning").unwrap(), Level::WARN);
        assert!(parse_log_level("loud").is_err());
    }

    #[test]
    fn test_parse_rust_log() {
        let mut config = LoggingConfig::default();
        config
            .parse_rust_log("warn, tessera_core=debug,tessera_ui=trace")
            .unwrap();
        assert_eq!(config.level.0, Level::WARN);
        assert_eq!(
            config.module_levels.get("tessera_core"),
            Some(&LogLevel(Level::DEBUG))
        );
        assert_eq!(
            config.module_levels.get("tessera_ui"),
            Some(&LogLevel(Level::TRACE))
        );

        assert!(config.parse_rust_log("tessera_core=chatty").is_err());
    }

    #[test]
    fn test_directives() {
        let mut config = LoggingConfig::default();
        config
            .module_levels
            .insert("tessera_core::bus".to_string(), LogLevel(Level::TRACE));
        assert_eq!(config.directives(), "info,tessera_core::bus=trace");
    }

    #[test]
    fn test_deserialize_partial_config() {
        // Partial configs fall back to defaults field by field
        let config: LoggingConfig = toml::from_str(
            r#"
            level = "debug"

            [module_levels]
            "tessera_core::bus" = "trace"

            [output]
            json = true
            "#,
        )
        .unwrap();
        assert_eq!(config.level.0, Level::DEBUG);
        assert_eq!(
            config.module_levels.get("tessera_core::bus"),
            Some(&LogLevel(Level::TRACE))
        );
        assert!(config.output.json);
        assert!(config.output.console);
        assert_eq!(config.file.max_files, 5);
    }
}
