// ABOUTME: Controllers owning the directed namespaces of the editor
// ABOUTME: Each one is the sole consumer of its namespace and broadcasts state changes

pub mod action;
pub mod environment;
pub mod layers_filter;
pub mod map_holder;
pub mod tools;

pub use action::ActionController;
pub use environment::{EnvironmentController, EnvironmentLoader};
pub use layers_filter::LayersFilterController;
pub use map_holder::{MapHolderController, MapStore};
pub use tools::ToolsController;

use tessera_core::{BusError, Event, EventKind, EventSender};
use tessera_logging::error;

/// Component that registers its consumers during startup wiring
pub trait Controller {
    /// Name used in wiring logs and errors
    fn name(&self) -> &'static str;

    fn register(&self) -> Result<(), BusError>;
}

/// Publish a broadcast from inside a consumer, where there is nobody to return an error to
pub(crate) fn broadcast<K: EventKind>(sender: &impl EventSender, body: K::Payload) {
    if let Err(err) = sender.send_event(Event::<K>::new(body)) {
        error!(error = %err, "Failed to broadcast event");
    }
}
