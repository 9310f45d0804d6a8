// ABOUTME: Holds the editing tool used on the canvas
// ABOUTME: Sole consumer of the tools_controller namespace

use parking_lot::Mutex;
use std::sync::Arc;

use tessera_core::catalog::{global, tools_controller};
use tessera_core::{BusAccess, BusError, BusHandle, EventConsumer};
use tessera_logging::debug;
use tessera_types::ToolType;

use super::{Controller, broadcast};

#[derive(Clone)]
pub struct ToolsController {
    bus: BusHandle,
    current: Arc<Mutex<ToolType>>,
}

impl BusAccess for ToolsController {
    fn bus(&self) -> &BusHandle {
        &self.bus
    }
}

impl ToolsController {
    pub fn new(bus: BusHandle) -> Self {
        Self {
            bus,
            current: Arc::new(Mutex::new(ToolType::default())),
        }
    }

    pub fn current(&self) -> ToolType {
        *self.current.lock()
    }

    fn switch(&self, tool: ToolType) {
        {
            let mut current = self.current.lock();
            if *current == tool {
                return;
            }
            *current = tool;
        }

        debug!(?tool, "Tool switched");
        broadcast::<global::SwitchUsedTool>(self, tool);
    }
}

impl Controller for ToolsController {
    fn name(&self) -> &'static str {
        "tools_controller"
    }

    fn register(&self) -> Result<(), BusError> {
        let this = self.clone();
        self.consume_event::<tools_controller::Switch, _>(move |event| {
            this.switch(*event.body());
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_core::Event;

    #[test]
    fn test_switch_broadcasts_changes_only() {
        let bus = BusHandle::default();
        let controller = ToolsController::new(bus.clone());
        controller.register().unwrap();

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        bus.register_consumer::<global::SwitchUsedTool, _>(move |event| {
            sink.lock().push(*event.body());
        })
        .unwrap();

        for tool in [ToolType::Tile, ToolType::Select, ToolType::Select, ToolType::Tile] {
            bus.publish(Event::<tools_controller::Switch>::new(tool))
                .unwrap();
        }

        assert_eq!(*seen.lock(), vec![ToolType::Select, ToolType::Tile]);
        assert_eq!(controller.current(), ToolType::Tile);
    }

    #[test]
    fn test_second_controller_cannot_register() {
        let bus = BusHandle::default();
        ToolsController::new(bus.clone()).register().unwrap();
        assert!(ToolsController::new(bus).register().is_err());
    }
}
