// ABOUTME: Event kind trait and broadcast/directed classification
// ABOUTME: Kinds are zero-sized marker types, never constructed at runtime

use std::fmt;

/// Namespaces starting with this prefix are broadcast, every other namespace is directed
pub const GLOBAL_PREFIX: &str = "global";

/// How many consumers a kind may legitimately have
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Delivery {
    /// Zero or more consumers, all invoked in registration order
    Broadcast,
    /// Exactly one consumer, owned by the component the namespace is named after
    Directed,
}

impl Delivery {
    /// Classify a namespace by its name
    pub const fn classify(namespace: &str) -> Delivery {
        let namespace = namespace.as_bytes();
        let prefix = GLOBAL_PREFIX.as_bytes();
        if namespace.len() < prefix.len() {
            return Delivery::Directed;
        }

        let mut i = 0;
        while i < prefix.len() {
            if namespace[i] != prefix[i] {
                return Delivery::Directed;
            }
            i += 1;
        }
        Delivery::Broadcast
    }

    pub const fn is_directed(self) -> bool {
        matches!(self, Delivery::Directed)
    }
}

impl fmt::Display for Delivery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Delivery::Broadcast => f.write_str("broadcast"),
            Delivery::Directed => f.write_str("directed"),
        }
    }
}

/// Statically declared event kind.
///
/// Use [`declare_events!`](crate::declare_events) rather than implementing this by hand:
/// the macro also checks that request/response kinds only live in directed namespaces.
pub trait EventKind: 'static {
    /// Data carried by the event, immutable once published
    type Payload: Send + Sync + 'static;

    /// Value handed back to the publisher's reply callback, `()` when there is none
    type Response: Send + 'static;

    const NAMESPACE: &'static str;
    const NAME: &'static str;

    const DELIVERY: Delivery = Delivery::classify(Self::NAMESPACE);

    const DESCRIPTOR: KindDescriptor = KindDescriptor {
        namespace: Self::NAMESPACE,
        name: Self::NAME,
        delivery: Self::DELIVERY,
    };
}

/// Runtime description of an event kind, used in errors, logs and wiring reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KindDescriptor {
    pub namespace: &'static str,
    pub name: &'static str,
    pub delivery: Delivery,
}

impl KindDescriptor {
    pub fn of<K: EventKind>() -> Self {
        K::DESCRIPTOR
    }
}

impl fmt::Display for KindDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.namespace, self.name)
    }
}
