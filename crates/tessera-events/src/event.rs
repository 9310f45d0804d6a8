// ABOUTME: Event envelope carrying an immutable payload and an optional reply callback
// ABOUTME: Replies are stashed during dispatch and delivered once the consumer has returned

use parking_lot::Mutex;
use std::fmt;

use crate::kind::{EventKind, KindDescriptor};

/// Publisher continuation receiving the consumer's response
pub type ReplyCallback<R> = Box<dyn FnOnce(R) + Send + 'static>;

/// What happened to the reply once dispatch finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyOutcome {
    /// The publisher callback received the consumer's response
    Delivered,
    /// The publisher did not ask for a response
    NoCallback,
    /// A callback was supplied but no consumer replied, so it never runs
    Dropped,
}

/// Instance of an event kind
pub struct Event<K: EventKind> {
    body: K::Payload,
    callback: Option<ReplyCallback<K::Response>>,
    reply: Mutex<Option<K::Response>>,
}

impl<K: EventKind> Event<K> {
    /// Fire-and-forget event
    pub fn new(body: K::Payload) -> Self {
        Self {
            body,
            callback: None,
            reply: Mutex::new(None),
        }
    }

    /// Request/response event. `callback` runs at most once, after the consumer returned.
    pub fn with_reply<F>(body: K::Payload, callback: F) -> Self
    where
        F: FnOnce(K::Response) + Send + 'static,
    {
        Self {
            body,
            callback: Some(Box::new(callback)),
            reply: Mutex::new(None),
        }
    }

    pub fn body(&self) -> &K::Payload {
        &self.body
    }

    pub fn descriptor(&self) -> KindDescriptor {
        K::DESCRIPTOR
    }

    pub fn has_reply_callback(&self) -> bool {
        self.callback.is_some()
    }

    /// Whether a consumer already replied during the current dispatch
    pub fn has_replied(&self) -> bool {
        self.reply.lock().is_some()
    }

    /// Hand a response back to the publisher.
    ///
    /// Only the first reply counts. The value is held until the consumer's handler
    /// returns, so the publisher never observes a half-finished consumer.
    pub fn reply(&self, response: K::Response) {
        if self.callback.is_none() {
            tracing::trace!(kind = %K::DESCRIPTOR, "Reply without callback discarded");
            return;
        }

        let mut slot = self.reply.lock();
        if slot.is_some() {
            tracing::warn!(kind = %K::DESCRIPTOR, "Event replied more than once, keeping first reply");
            return;
        }
        *slot = Some(response);
    }

    /// Close the dispatch: run the publisher callback with the stashed reply, if any.
    ///
    /// Called by the dispatch bus after every consumer returned.
    pub fn finish(self) -> ReplyOutcome {
        let Self {
            callback, reply, ..
        } = self;

        match (callback, reply.into_inner()) {
            (None, _) => ReplyOutcome::NoCallback,
            (Some(callback), Some(response)) => {
                callback(response);
                ReplyOutcome::Delivered
            }
            (Some(_), None) => {
                tracing::debug!(kind = %K::DESCRIPTOR, "Reply callback dropped without a response");
                ReplyOutcome::Dropped
            }
        }
    }
}

impl<K: EventKind> fmt::Debug for Event<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("kind", &K::DESCRIPTOR)
            .field("has_reply_callback", &self.has_reply_callback())
            .field("has_replied", &self.has_replied())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{environment_controller, global};
    use std::path::PathBuf;
    use std::sync::Arc;
    use tessera_types::Dme;

    #[test]
    fn test_reply_is_delivered_on_finish() {
        let received = Arc::new(Mutex::new(Vec::new()));
        let sink = received.clone();
        let event = Event::<environment_controller::Open>::with_reply(
            PathBuf::from("/station/station.dme"),
            move |ok| sink.lock().push(ok),
        );

        event.reply(true);
        // Nothing reaches the publisher until dispatch is closed
        assert!(received.lock().is_empty());

        assert_eq!(event.finish(), ReplyOutcome::Delivered);
        assert_eq!(*received.lock(), vec![true]);
    }

    #[test]
    fn test_only_first_reply_counts() {
        let received = Arc::new(Mutex::new(Vec::new()));
        let sink = received.clone();
        let event = Event::<environment_controller::Fetch>::with_reply((), move |dme| {
            sink.lock().push(dme)
        });

        event.reply(Dme::new("first", "/first"));
        event.reply(Dme::new("second", "/second"));

        assert_eq!(event.finish(), ReplyOutcome::Delivered);
        let received = received.lock();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].name, "first");
    }

    #[test]
    fn test_missing_reply_is_dropped() {
        let called = Arc::new(Mutex::new(false));
        let flag = called.clone();
        let event =
            Event::<environment_controller::Fetch>::with_reply((), move |_| *flag.lock() = true);

        assert_eq!(event.finish(), ReplyOutcome::Dropped);
        assert!(!*called.lock());
    }

    #[test]
    fn test_fire_and_forget() {
        let event = Event::<global::RefreshFrame>::new(());
        assert!(!event.has_reply_callback());
        event.reply(());
        assert!(!event.has_replied());
        assert_eq!(event.finish(), ReplyOutcome::NoCallback);
    }
}
