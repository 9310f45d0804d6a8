// ABOUTME: Tracing subscriber initialization and layer composition
// ABOUTME: Stacks the enabled output layers on top of a (optionally reloadable) filter

use anyhow::{Context, Result};
use parking_lot::{Mutex, const_mutex};
use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{prelude::*, reload};

use crate::config::LoggingConfig;
use crate::layers::{
    BoxedLayer, create_console_layer, create_env_filter, create_file_layer, create_json_layer,
};
use crate::reload::LoggingReloadHandle;

/// Guards of the background file writers, dropped by [`flush_logs`]
static WRITER_GUARDS: Mutex<Vec<WorkerGuard>> = const_mutex(Vec::new());

/// Initialize the global tracing subscriber with the given configuration.
pub fn init_subscriber(config: LoggingConfig) -> Result<()> {
    let env_filter = create_env_filter(&config).context("Failed to create environment filter")?;
    install(tracing_subscriber::registry().with(env_filter), &config)?;

    tracing::info!(
        log_level = %config.level.0,
        console_output = config.output.console,
        file_output = config.output.file,
        json_output = config.output.json,
        file_path = %config.file.path.display(),
        "Tessera logging initialized"
    );

    Ok(())
}

/// Initialize the global tracing subscriber with hot-reload support.
///
/// Returns a LoggingReloadHandle that can be used to update log levels at runtime.
pub fn init_subscriber_with_reload(config: LoggingConfig) -> Result<LoggingReloadHandle> {
    let env_filter = create_env_filter(&config).context("Failed to create environment filter")?;
    let (filter_layer, filter_handle) = reload::Layer::new(env_filter);
    install(tracing_subscriber::registry().with(filter_layer), &config)?;

    tracing::info!(
        log_level = %config.level.0,
        console_output = config.output.console,
        file_output = config.output.file,
        json_output = config.output.json,
        file_path = %config.file.path.display(),
        reload_enabled = true,
        "Tessera logging initialized with hot-reload support"
    );

    Ok(LoggingReloadHandle::new(filter_handle, config))
}

/// Flush and close file outputs. Call once on shutdown; later events only reach the console.
pub fn flush_logs() {
    WRITER_GUARDS.lock().clear();
}

fn install<S>(subscriber: S, config: &LoggingConfig) -> Result<()>
where
    S: Subscriber + for<'a> LookupSpan<'a> + Send + Sync + 'static,
{
    let mut layers: Vec<BoxedLayer<S>> = Vec::new();

    if let Some(console) = create_console_layer(&config.output) {
        layers.push(console);
    }

    let mut guard = None;
    if config.output.file {
        let (file, file_guard) =
            create_file_layer(&config.file).context("Failed to set up file logging")?;
        layers.push(file);
        guard = Some(file_guard);
    }

    if let Some(json) = create_json_layer(&config.output) {
        layers.push(json);
    }

    subscriber
        .with(layers)
        .try_init()
        .context("A global tracing subscriber is already installed")?;

    if let Some(guard) = guard {
        WRITER_GUARDS.lock().push(guard);
    }
    Ok(())
}
