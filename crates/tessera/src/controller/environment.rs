// ABOUTME: Loads environments and announces environment switches
// ABOUTME: Sole consumer of the environment_controller namespace

use anyhow::{Context, Result};
use parking_lot::Mutex;
use std::path::Path;
use std::sync::Arc;

use tessera_core::catalog::{environment_controller, global};
use tessera_core::{BusAccess, BusError, BusHandle, Event, EventConsumer};
use tessera_logging::{error, info, instrument};
use tessera_types::Dme;

use super::{Controller, broadcast};

/// Parses an environment file into its handle
pub trait EnvironmentLoader: Send + Sync {
    fn load(&self, path: &Path) -> Result<Dme>;
}

/// Loader that validates the `.dme` path and takes the environment name from the file stem
#[derive(Debug, Default, Clone, Copy)]
pub struct FsEnvironmentLoader;

impl EnvironmentLoader for FsEnvironmentLoader {
    fn load(&self, path: &Path) -> Result<Dme> {
        let path = path
            .canonicalize()
            .with_context(|| format!("Environment file not found: {}", path.display()))?;

        if path.extension().and_then(|ext| ext.to_str()) != Some("dme") {
            anyhow::bail!("Not an environment file: {}", path.display());
        }

        let name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .context("Environment file name is not valid UTF-8")?;
        let root = path
            .parent()
            .context("Environment file has no parent directory")?;
        Ok(Dme::new(name, root))
    }
}

#[derive(Clone)]
pub struct EnvironmentController {
    bus: BusHandle,
    loader: Arc<dyn EnvironmentLoader>,
    current: Arc<Mutex<Option<Dme>>>,
}

impl BusAccess for EnvironmentController {
    fn bus(&self) -> &BusHandle {
        &self.bus
    }
}

impl EnvironmentController {
    pub fn new(bus: BusHandle, loader: Arc<dyn EnvironmentLoader>) -> Self {
        Self {
            bus,
            loader,
            current: Arc::new(Mutex::new(None)),
        }
    }

    pub fn current(&self) -> Option<Dme> {
        self.current.lock().clone()
    }

    #[instrument(skip(self, event), fields(path = %event.body().display()))]
    fn handle_open(&self, event: &Event<environment_controller::Open>) {
        let dme = match self.loader.load(event.body()) {
            Ok(dme) => dme,
            Err(err) => {
                error!(error = %err, "Failed to load environment");
                event.reply(false);
                return;
            }
        };

        broadcast::<global::ResetEnvironment>(self, ());
        *self.current.lock() = Some(dme.clone());
        info!(name = %dme.name, root = %dme.root_path.display(), "Environment opened");
        broadcast::<global::SwitchEnvironment>(self, dme);
        event.reply(true);
    }

    fn handle_fetch(&self, event: &Event<environment_controller::Fetch>) {
        if let Some(dme) = self.current() {
            event.reply(dme);
        }
    }
}

impl Controller for EnvironmentController {
    fn name(&self) -> &'static str {
        "environment_controller"
    }

    fn register(&self) -> Result<(), BusError> {
        let this = self.clone();
        self.consume_event::<environment_controller::Open, _>(move |event| {
            this.handle_open(event);
        })?;

        let this = self.clone();
        self.consume_event::<environment_controller::Fetch, _>(move |event| {
            this.handle_fetch(event);
        })?;
        Ok(())
    }
}
