// ABOUTME: Dispatch bus routing catalog events from publishers to their consumers
// ABOUTME: Synchronous, in registration order, with directed-kind cardinality checks

pub mod bus;
pub mod error;
pub mod global;
pub mod sender;

#[cfg(test)]
mod bus_tests;

pub use bus::{BusHandle, ConsumerId, DispatchBus};
pub use error::BusError;
pub use global::{global, install_global};
pub use sender::{BusAccess, EventConsumer, EventSender};

// Re-export the catalog so components only need this crate
pub use tessera_events::{self as events, Delivery, Event, EventKind, KindDescriptor, catalog};
