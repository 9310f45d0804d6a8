// ABOUTME: Application configuration loaded from tessera.toml
// ABOUTME: Missing files fall back to defaults, malformed files are reported

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use tessera_logging::info;

pub const CONFIG_FILE_NAME: &str = "tessera.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub bus: BusConfig,
    pub environment: EnvironmentConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusConfig {
    /// Consumers running longer than this are logged, 0 disables the check
    pub slow_consumer_ms: u64,
    /// Log directed kinds nobody consumes after wiring
    pub report_unwired: bool,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            // One frame at 60fps
            slow_consumer_ms: 16,
            report_unwired: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    /// Directory the environment picker starts in
    pub default_root: Option<PathBuf>,
}

impl BusConfig {
    pub fn slow_consumer_threshold(&self) -> Option<Duration> {
        (self.slow_consumer_ms > 0).then(|| Duration::from_millis(self.slow_consumer_ms))
    }
}

/// Directory holding tessera.toml and the log file
pub fn config_dir() -> PathBuf {
    match dirs::config_dir() {
        Some(dir) => dir.join("tessera"),
        None => PathBuf::from("."),
    }
}

impl AppConfig {
    /// Load configuration from the standard location
    pub fn load() -> Result<Self> {
        Self::load_from_dir(&config_dir())
    }

    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        if !path.exists() {
            info!(config_path = %path.display(), "No configuration file found, using defaults");
            return Ok(Self::default());
        }
        Self::load_from_file(&path)
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        info!(
            config_path = %path.display(),
            slow_consumer_ms = config.bus.slow_consumer_ms,
            report_unwired = config.bus.report_unwired,
            "Loaded configuration"
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let temp_dir = tempdir().unwrap();
        let config = AppConfig::load_from_dir(temp_dir.path()).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(
            config.bus.slow_consumer_threshold(),
            Some(Duration::from_millis(16))
        );
    }

    #[test]
    fn test_partial_file() {
        let temp_dir = tempdir().unwrap();
        fs::write(
            temp_dir.path().join(CONFIG_FILE_NAME),
            r#"
            [bus]
            slow_consumer_ms = 0

            [environment]
            default_root = "/srv/ss13"
            "#,
        )
        .unwrap();

        let config = AppConfig::load_from_dir(temp_dir.path()).unwrap();
        assert_eq!(config.bus.slow_consumer_threshold(), None);
        assert!(config.bus.report_unwired);
        assert_eq!(
            config.environment.default_root,
            Some(PathBuf::from("/srv/ss13"))
        );
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[bus]\nslow_consumer_ms = \"fast\"\n").unwrap();

        let err = AppConfig::load_from_dir(temp_dir.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
