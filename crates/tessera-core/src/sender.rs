// ABOUTME: Extension traits giving components sendEvent/consumeEvent style helpers
// ABOUTME: Implement BusAccess once and both traits come for free

use tessera_events::{Event, EventKind};

use crate::bus::{BusHandle, ConsumerId};
use crate::error::BusError;

/// Component holding a handle to the dispatch bus
pub trait BusAccess {
    fn bus(&self) -> &BusHandle;
}

/// Publishing side of a component
pub trait EventSender: BusAccess {
    fn send_event<K: EventKind>(&self, event: Event<K>) -> Result<(), BusError> {
        self.bus().publish(event)
    }

    /// Pull a value from the kind's consumer, see [`DispatchBus::request`](crate::DispatchBus::request)
    fn request<K: EventKind>(&self, body: K::Payload) -> Result<Option<K::Response>, BusError> {
        self.bus().request::<K>(body)
    }
}

/// Consuming side of a component
pub trait EventConsumer: BusAccess {
    fn consume_event<K, F>(&self, handler: F) -> Result<ConsumerId, BusError>
    where
        K: EventKind,
        F: Fn(&Event<K>) + Send + Sync + 'static,
    {
        self.bus().register_consumer::<K, F>(handler)
    }
}

impl<T: BusAccess + ?Sized> EventSender for T {}
impl<T: BusAccess + ?Sized> EventConsumer for T {}
