// ABOUTME: Startup wiring: builds the bus, registers every controller and the menu bar
// ABOUTME: Registration happens here, before any event is published

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tessera_core::catalog::{self, environment_controller, map_holder_controller};
use tessera_core::{BusHandle, DispatchBus, Event, KindDescriptor, install_global};
use tessera_logging::{info, instrument, warn};
use tessera_ui::{FilePicker, MenuBar};

use crate::config::AppConfig;
use crate::controller::{
    ActionController, Controller, EnvironmentController, EnvironmentLoader,
    LayersFilterController, MapHolderController, MapStore, ToolsController,
};

/// External collaborators the controllers delegate to
#[derive(Clone)]
pub struct Services {
    pub loader: Arc<dyn EnvironmentLoader>,
    pub store: Arc<dyn MapStore>,
    pub picker: Arc<dyn FilePicker>,
}

pub struct Application {
    bus: BusHandle,
    config: AppConfig,
    pub menu_bar: MenuBar,
    pub environment: EnvironmentController,
    pub maps: MapHolderController,
    pub actions: ActionController,
    pub layers_filter: LayersFilterController,
    pub tools: ToolsController,
}

impl Application {
    /// Build a bus and register every component on it.
    ///
    /// Any wiring defect (a second consumer for a directed kind) aborts startup.
    #[instrument(skip_all)]
    pub fn wire(config: AppConfig, services: Services) -> Result<Self> {
        let mut bus = DispatchBus::new();
        if let Some(threshold) = config.bus.slow_consumer_threshold() {
            bus = bus.with_slow_consumer_threshold(threshold);
        }
        let bus = BusHandle::new(bus);

        let app = Self {
            environment: EnvironmentController::new(bus.clone(), services.loader),
            maps: MapHolderController::new(bus.clone(), services.store),
            actions: ActionController::new(bus.clone()),
            layers_filter: LayersFilterController::new(bus.clone()),
            tools: ToolsController::new(bus.clone()),
            menu_bar: match &config.environment.default_root {
                Some(root) => MenuBar::new(bus.clone(), services.picker).with_default_root(root),
                None => MenuBar::new(bus.clone(), services.picker),
            },
            bus,
            config,
        };

        for controller in app.controllers() {
            controller
                .register()
                .with_context(|| format!("Failed to register {}", controller.name()))?;
        }
        app.menu_bar
            .register()
            .context("Failed to register menu bar")?;

        install_global(app.bus.clone());

        if app.config.bus.report_unwired {
            app.report_unwired();
        }
        info!(
            kinds = app.bus.registrations().len(),
            "Event consumers wired"
        );
        Ok(app)
    }

    pub fn bus(&self) -> &BusHandle {
        &self.bus
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    fn controllers(&self) -> [&dyn Controller; 5] {
        [
            &self.environment,
            &self.maps,
            &self.actions,
            &self.layers_filter,
            &self.tools,
        ]
    }

    /// Directed kinds without a consumer; publishing one of them is an error
    pub fn unwired(&self) -> Vec<KindDescriptor> {
        self.bus.unwired(&catalog::all_kinds())
    }

    fn report_unwired(&self) {
        let unwired = self.unwired();
        for kind in &unwired {
            warn!(kind = %kind, "Directed event has no consumer");
        }
        if !unwired.is_empty() {
            info!(count = unwired.len(), "Directed events left unwired");
        }
    }

    /// Open an environment and then the given maps, as requested on the command line
    pub fn open_startup_files(&self, environment: &Path, maps: &[PathBuf]) -> Result<()> {
        let opened = self
            .bus
            .request::<environment_controller::Open>(environment.to_path_buf())
            .context("Failed to request environment")?;
        if opened != Some(true) {
            anyhow::bail!("Could not open environment: {}", environment.display());
        }

        for map in maps {
            self.bus
                .publish(Event::<map_holder_controller::Open>::new(map.clone()))
                .context("Failed to request map")?;
        }
        Ok(())
    }
}
