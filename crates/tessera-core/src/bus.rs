// ABOUTME: Registration table and synchronous publish for catalog events
// ABOUTME: Handlers run on the publisher's thread, in registration order

use parking_lot::{Mutex, RwLock};
use std::any::{Any, TypeId};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::ops::Deref;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tessera_events::{Event, EventKind, KindDescriptor};
use tessera_logging::PerfTimer;
use tracing::{debug, error, info, trace};

use crate::error::BusError;

type Handler<K> = Arc<dyn Fn(&Event<K>) + Send + Sync + 'static>;

/// Token identifying one registration, used to unregister it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConsumerId(u64);

struct Registration {
    id: ConsumerId,
    // Always a `Handler<K>` for the kind the slot is keyed by
    handler: Box<dyn Any + Send + Sync>,
}

struct Slot {
    kind: KindDescriptor,
    consumers: Vec<Registration>,
}

/// Process-wide registry of event consumers
pub struct DispatchBus {
    slots: RwLock<HashMap<TypeId, Slot>>,
    next_consumer: AtomicU64,
    slow_consumer_threshold: Option<Duration>,
}

impl DispatchBus {
    pub fn new() -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
            next_consumer: AtomicU64::new(1),
            slow_consumer_threshold: None,
        }
    }

    /// Warn about consumers whose handler takes longer than `threshold`
    pub fn with_slow_consumer_threshold(mut self, threshold: Duration) -> Self {
        self.slow_consumer_threshold = Some(threshold);
        self
    }

    /// Add a consumer for kind `K`.
    ///
    /// Directed kinds accept exactly one consumer; a second registration fails with
    /// [`BusError::DuplicateConsumer`] and leaves the first one in place.
    pub fn register_consumer<K, F>(&self, handler: F) -> Result<ConsumerId, BusError>
    where
        K: EventKind,
        F: Fn(&Event<K>) + Send + Sync + 'static,
    {
        let kind = K::DESCRIPTOR;
        let mut slots = self.slots.write();
        let slot = slots.entry(TypeId::of::<K>()).or_insert_with(|| Slot {
            kind,
            consumers: Vec::new(),
        });

        if kind.delivery.is_directed() && !slot.consumers.is_empty() {
            error!(kind = %kind, "Directed event already has a consumer");
            return Err(BusError::DuplicateConsumer { kind });
        }

        let id = ConsumerId(self.next_consumer.fetch_add(1, Ordering::Relaxed));
        let handler: Handler<K> = Arc::new(handler);
        slot.consumers.push(Registration {
            id,
            handler: Box::new(handler),
        });

        info!(
            kind = %kind,
            consumer = id.0,
            consumers = slot.consumers.len() as u64,
            "Consumer registered"
        );
        Ok(id)
    }

    /// Remove a registration. Returns false when it was not registered for `K`.
    pub fn unregister_consumer<K: EventKind>(&self, id: ConsumerId) -> bool {
        let mut slots = self.slots.write();
        let Some(slot) = slots.get_mut(&TypeId::of::<K>()) else {
            return false;
        };
        let Some(position) = slot.consumers.iter().position(|r| r.id == id) else {
            return false;
        };

        slot.consumers.remove(position);
        if slot.consumers.is_empty() {
            slots.remove(&TypeId::of::<K>());
        }
        info!(kind = %K::DESCRIPTOR, consumer = id.0, "Consumer unregistered");
        true
    }

    /// Invoke every consumer of the event's kind, then hand any reply to the publisher.
    ///
    /// The table lock is released before handlers run, so a handler may publish
    /// (depth-first) or register consumers itself.
    pub fn publish<K: EventKind>(&self, event: Event<K>) -> Result<(), BusError> {
        let kind = K::DESCRIPTOR;
        let handlers = self.handlers::<K>();

        if kind.delivery.is_directed() {
            match handlers.len() {
                1 => {}
                0 => {
                    error!(kind = %kind, "Directed event published with no consumer");
                    return Err(BusError::NoConsumer { kind });
                }
                // Registration rejects duplicates, so this only guards the table invariant
                count => {
                    error!(kind = %kind, count, "Directed event has several consumers");
                    return Err(BusError::MultipleConsumers { kind, count });
                }
            }
        }

        let span = tracing::debug_span!(
            "publish",
            kind = %kind,
            consumers = handlers.len() as u64
        );
        let _enter = span.enter();

        if handlers.is_empty() {
            trace!("Broadcast event has no consumers");
        }

        for handler in &handlers {
            let _timer = self
                .slow_consumer_threshold
                .map(|threshold| PerfTimer::new(kind.to_string()).with_warn_threshold(threshold));
            handler(&event);
        }

        let outcome = event.finish();
        trace!(?outcome, "Dispatch finished");
        Ok(())
    }

    /// Publish a request and return the consumer's reply.
    ///
    /// `None` means the consumer returned without replying. Intended for directed
    /// provider-style kinds, where it acts as a getter routed through the bus.
    pub fn request<K: EventKind>(&self, body: K::Payload) -> Result<Option<K::Response>, BusError> {
        let reply = Arc::new(Mutex::new(None));
        let sink = reply.clone();
        self.publish(Event::<K>::with_reply(body, move |response| {
            *sink.lock() = Some(response);
        }))?;

        let response = reply.lock().take();
        if response.is_none() {
            debug!(kind = %K::DESCRIPTOR, "Request answered without a reply");
        }
        Ok(response)
    }

    pub fn consumer_count<K: EventKind>(&self) -> usize {
        self.slots
            .read()
            .get(&TypeId::of::<K>())
            .map_or(0, |slot| slot.consumers.len())
    }

    /// Every kind with at least one consumer, sorted by namespace and name
    pub fn registrations(&self) -> Vec<(KindDescriptor, usize)> {
        let slots = self.slots.read();
        let sorted: BTreeMap<KindDescriptor, usize> = slots
            .values()
            .filter(|slot| !slot.consumers.is_empty())
            .map(|slot| (slot.kind, slot.consumers.len()))
            .collect();
        sorted.into_iter().collect()
    }

    /// Directed kinds among `kinds` that nobody consumes yet
    pub fn unwired(&self, kinds: &[KindDescriptor]) -> Vec<KindDescriptor> {
        let wired: HashSet<KindDescriptor> = self
            .registrations()
            .into_iter()
            .map(|(kind, _)| kind)
            .collect();

        kinds
            .iter()
            .filter(|kind| kind.delivery.is_directed() && !wired.contains(kind))
            .copied()
            .collect()
    }

    // Snapshot so no lock is held while handlers run
    fn handlers<K: EventKind>(&self) -> Vec<Handler<K>> {
        let slots = self.slots.read();
        let Some(slot) = slots.get(&TypeId::of::<K>()) else {
            return Vec::new();
        };

        slot.consumers
            .iter()
            .filter_map(|r| r.handler.downcast_ref::<Handler<K>>().cloned())
            .collect()
    }
}

impl Default for DispatchBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared handle to a dispatch bus, cheap to clone into components
#[derive(Clone)]
pub struct BusHandle {
    inner: Arc<DispatchBus>,
}

impl BusHandle {
    pub fn new(bus: DispatchBus) -> Self {
        Self {
            inner: Arc::new(bus),
        }
    }

    /// Whether both handles point at the same bus
    pub fn same_bus(&self, other: &BusHandle) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Default for BusHandle {
    fn default() -> Self {
        Self::new(DispatchBus::new())
    }
}

impl Deref for BusHandle {
    type Target = DispatchBus;

    fn deref(&self) -> &DispatchBus {
        &self.inner
    }
}

impl From<DispatchBus> for BusHandle {
    fn from(bus: DispatchBus) -> Self {
        Self::new(bus)
    }
}
