// ABOUTME: Runtime log level reloading without restarting the editor
// ABOUTME: Rebuilds the EnvFilter from an updated copy of the logging configuration

use anyhow::{Context, Result};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, Registry, reload};

use crate::config::LoggingConfig;
use crate::layers::create_env_filter;

/// Handle for updating log configuration at runtime
#[derive(Clone)]
pub struct LoggingReloadHandle {
    filter_handle: reload::Handle<EnvFilter, Registry>,
    current_config: Arc<RwLock<LoggingConfig>>,
}

impl LoggingReloadHandle {
    pub fn new(filter_handle: reload::Handle<EnvFilter, Registry>, config: LoggingConfig) -> Self {
        Self {
            filter_handle,
            current_config: Arc::new(RwLock::new(config)),
        }
    }

    /// Update the global log level at runtime
    pub fn update_log_level(&self, level: tracing::Level) -> Result<()> {
        self.apply(|config| config.level = level.into())?;
        tracing::info!(new_level = %level, "Log level updated at runtime");
        Ok(())
    }

    /// Update one module's log level, e.g. to trace every dispatch of the event bus
    pub fn update_module_level(&self, module: &str, level: tracing::Level) -> Result<()> {
        self.apply(|config| {
            config
                .module_levels
                .insert(module.to_string(), level.into());
        })?;
        tracing::info!(module = %module, new_level = %level, "Module log level updated at runtime");
        Ok(())
    }

    /// Get current configuration (clone)
    pub fn current_config(&self) -> LoggingConfig {
        self.current_config.read().clone()
    }

    // The stored config only changes once the new filter is live
    fn apply(&self, update: impl FnOnce(&mut LoggingConfig)) -> Result<()> {
        let mut config = self.current_config.write();
        let mut updated = config.clone();
        update(&mut updated);

        let new_filter =
            create_env_filter(&updated).context("Failed to create new environment filter")?;
        self.filter_handle
            .reload(new_filter)
            .context("Failed to reload log filter")?;

        *config = updated;
        Ok(())
    }
}
