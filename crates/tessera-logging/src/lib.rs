// ABOUTME: Public API for tessera logging infrastructure using tokio-tracing
// ABOUTME: Provides centralized configuration and initialization for structured logging

pub mod config;
pub mod layers;
pub mod performance;
pub mod reload;
pub mod subscriber;

#[cfg(test)]
mod structured_tests;

// Re-export tracing macros for convenience
pub use tracing::{Level, Span, debug, error, info, instrument, span, trace, warn};

use std::sync::OnceLock;

pub use config::LoggingConfig;
pub use performance::PerfTimer;
pub use reload::LoggingReloadHandle;
pub use subscriber::{flush_logs, init_subscriber, init_subscriber_with_reload};

use anyhow::Result;

/// Global reload handle for runtime log level updates
static GLOBAL_RELOAD_HANDLE: OnceLock<LoggingReloadHandle> = OnceLock::new();

/// Initialize logging with configuration read from the environment.
pub fn init_logging() -> Result<()> {
    init_subscriber(LoggingConfig::from_env()?)
}

/// Initialize logging with hot-reload support.
///
/// The handle is also stored globally so [`update_log_level`] and
/// [`update_module_level`] work from anywhere.
pub fn init_logging_with_reload(config: LoggingConfig) -> Result<LoggingReloadHandle> {
    let handle = init_subscriber_with_reload(config)?;
    let _ = GLOBAL_RELOAD_HANDLE.set(handle.clone());
    Ok(handle)
}

fn reload_handle() -> Result<&'static LoggingReloadHandle> {
    match GLOBAL_RELOAD_HANDLE.get() {
        Some(handle) => Ok(handle),
        None => anyhow::bail!("Logging not initialized with reload support"),
    }
}

/// Update the global log level at runtime.
pub fn update_log_level(level: Level) -> Result<()> {
    reload_handle()?.update_log_level(level)
}

/// Update one module's log level at runtime.
pub fn update_module_level(module: &str, level: Level) -> Result<()> {
    reload_handle()?.update_module_level(module, level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_without_reload_support() {
        // The reload handle is only set by init_logging_with_reload, which tests never call
        assert!(update_log_level(Level::DEBUG).is_err());
        assert!(update_module_level("tessera_core", Level::TRACE).is_err());
    }

    #[test]
    fn test_macros_available() {
        info!("Test info message");
        debug!(kind = "global::RefreshFrame", "Test debug message");
        warn!("Test warning message");
        error!("Test error message");
    }
}
