// ABOUTME: Behavioural tests for the dispatch bus against catalog kinds
// ABOUTME: Covers cardinality, ordering, reply timing, re-entrancy and log output

#[cfg(test)]
mod tests {
    use parking_lot::Mutex;
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    use tessera_events::catalog::{
        self, canvas_controller, environment_controller, global, map_holder_controller,
        tools_controller,
    };
    use tessera_events::{Event, EventKind};
    use tessera_types::{Dme, Dmm, MapId, MapPos, ToolType};
    use tracing_mock::{expect, subscriber};

    use crate::{BusError, BusHandle, DispatchBus};

    type Trace = Arc<Mutex<Vec<String>>>;

    fn trace() -> Trace {
        Arc::new(Mutex::new(Vec::new()))
    }

    fn push(trace: &Trace, entry: impl Into<String>) {
        trace.lock().push(entry.into());
    }

    #[test]
    fn test_duplicate_directed_registration_is_rejected() {
        let bus = DispatchBus::new();
        let seen = trace();

        let sink = seen.clone();
        bus.register_consumer::<tools_controller::Switch, _>(move |event| {
            push(&sink, format!("first:{:?}", event.body()));
        })
        .unwrap();

        let sink = seen.clone();
        let err = bus
            .register_consumer::<tools_controller::Switch, _>(move |_| push(&sink, "second"))
            .unwrap_err();
        assert_eq!(
            err,
            BusError::DuplicateConsumer {
                kind: tools_controller::Switch::DESCRIPTOR
            }
        );
        assert_eq!(bus.consumer_count::<tools_controller::Switch>(), 1);

        // The first consumer still receives the event
        bus.publish(Event::<tools_controller::Switch>::new(ToolType::Select))
            .unwrap();
        assert_eq!(*seen.lock(), vec!["first:Select".to_string()]);
    }

    #[test]
    fn test_directed_publish_without_consumer_fails() {
        let bus = DispatchBus::new();
        let replied = Arc::new(Mutex::new(false));

        let flag = replied.clone();
        let result = bus.publish(Event::<environment_controller::Open>::with_reply(
            PathBuf::from("/tmp/station.dme"),
            move |_| *flag.lock() = true,
        ));

        assert_eq!(
            result,
            Err(BusError::NoConsumer {
                kind: environment_controller::Open::DESCRIPTOR
            })
        );
        assert!(!*replied.lock());
    }

    #[test]
    fn test_broadcast_runs_consumers_in_registration_order() {
        let bus = DispatchBus::new();
        let seen = trace();

        for name in ["A", "B", "C"] {
            let sink = seen.clone();
            bus.register_consumer::<global::MapMousePosChanged, _>(move |event| {
                push(&sink, format!("{name}{}", event.body()));
            })
            .unwrap();
        }

        bus.publish(Event::<global::MapMousePosChanged>::new(MapPos::new(1, 2, 1)))
            .unwrap();
        assert_eq!(
            *seen.lock(),
            vec!["A(1, 2, 1)", "B(1, 2, 1)", "C(1, 2, 1)"]
        );
    }

    #[test]
    fn test_broadcast_without_consumers_is_noop() {
        let bus = DispatchBus::new();
        assert!(bus.publish(Event::<global::RefreshFrame>::new(())).is_ok());
        assert_eq!(bus.consumer_count::<global::RefreshFrame>(), 0);
    }

    #[test]
    fn test_reply_delivered_once_after_consumer_returns() {
        let bus = DispatchBus::new();
        let seen = trace();

        let sink = seen.clone();
        bus.register_consumer::<environment_controller::Open, _>(move |event| {
            push(&sink, "consumer-start");
            event.reply(true);
            event.reply(false);
            push(&sink, "consumer-end");
        })
        .unwrap();

        let sink = seen.clone();
        bus.publish(Event::<environment_controller::Open>::with_reply(
            PathBuf::from("/tmp/station.dme"),
            move |ok| push(&sink, format!("reply:{ok}")),
        ))
        .unwrap();

        assert_eq!(
            *seen.lock(),
            vec!["consumer-start", "consumer-end", "reply:true"]
        );
    }

    #[test]
    fn test_reentrant_publish_is_depth_first() {
        let bus = BusHandle::default();
        let seen = trace();

        let sink = seen.clone();
        bus.register_consumer::<global::RefreshFrame, _>(move |_| {
            push(&sink, "Y-start");
            push(&sink, "Y-end");
        })
        .unwrap();

        let sink = seen.clone();
        let inner = bus.clone();
        bus.register_consumer::<global::SwitchMap, _>(move |_| {
            push(&sink, "X-start");
            inner.publish(Event::<global::RefreshFrame>::new(())).unwrap();
            push(&sink, "X-end");
        })
        .unwrap();

        bus.publish(Event::<global::SwitchMap>::new(Dmm::new(
            MapId(1),
            "maps/station.dmm",
        )))
        .unwrap();
        assert_eq!(*seen.lock(), vec!["X-start", "Y-start", "Y-end", "X-end"]);
    }

    #[test]
    fn test_consumer_may_register_during_dispatch() {
        let bus = BusHandle::default();
        let seen = trace();

        let sink = seen.clone();
        let inner = bus.clone();
        bus.register_consumer::<global::ResetEnvironment, _>(move |_| {
            let late = sink.clone();
            inner
                .register_consumer::<global::RefreshFrame, _>(move |_| push(&late, "late"))
                .unwrap();
        })
        .unwrap();

        bus.publish(Event::<global::ResetEnvironment>::new(()))
            .unwrap();
        bus.publish(Event::<global::RefreshFrame>::new(())).unwrap();
        assert_eq!(*seen.lock(), vec!["late"]);
    }

    #[test]
    fn test_unregister_consumer() {
        let bus = DispatchBus::new();
        let seen = trace();

        let sink = seen.clone();
        let first = bus
            .register_consumer::<global::RefreshFrame, _>(move |_| push(&sink, "first"))
            .unwrap();
        let sink = seen.clone();
        bus.register_consumer::<global::RefreshFrame, _>(move |_| push(&sink, "second"))
            .unwrap();

        assert!(bus.unregister_consumer::<global::RefreshFrame>(first));
        assert!(!bus.unregister_consumer::<global::RefreshFrame>(first));
        // Tokens are only valid for the kind they were issued for
        assert!(!bus.unregister_consumer::<global::SwitchMap>(first));

        bus.publish(Event::<global::RefreshFrame>::new(())).unwrap();
        assert_eq!(*seen.lock(), vec!["second"]);
    }

    #[test]
    fn test_unregistered_directed_kind_can_be_rewired() {
        let bus = DispatchBus::new();
        let id = bus
            .register_consumer::<canvas_controller::Block, _>(|_| {})
            .unwrap();
        assert!(bus.unregister_consumer::<canvas_controller::Block>(id));
        assert!(bus.publish(Event::<canvas_controller::Block>::new(true)).is_err());

        assert!(
            bus.register_consumer::<canvas_controller::Block, _>(|_| {})
                .is_ok()
        );
        assert!(bus.publish(Event::<canvas_controller::Block>::new(true)).is_ok());
    }

    #[test]
    fn test_request_returns_reply() {
        let bus = DispatchBus::new();
        bus.register_consumer::<environment_controller::Fetch, _>(|event| {
            event.reply(Dme::new("station", "/srv/station"));
        })
        .unwrap();

        let dme = bus.request::<environment_controller::Fetch>(()).unwrap();
        assert_eq!(dme.map(|dme| dme.name), Some("station".to_string()));
    }

    #[test]
    fn test_request_without_reply_is_none() {
        let bus = DispatchBus::new();
        bus.register_consumer::<map_holder_controller::FetchSelected, _>(|_| {})
            .unwrap();

        assert_eq!(
            bus.request::<map_holder_controller::FetchSelected>(()),
            Ok(None)
        );
        assert!(
            bus.request::<map_holder_controller::FetchOpened>(())
                .is_err()
        );
    }

    #[test]
    fn test_registrations_and_unwired() {
        let bus = DispatchBus::new();
        bus.register_consumer::<tools_controller::Switch, _>(|_| {})
            .unwrap();
        bus.register_consumer::<global::RefreshFrame, _>(|_| {})
            .unwrap();
        bus.register_consumer::<global::RefreshFrame, _>(|_| {})
            .unwrap();

        assert_eq!(
            bus.registrations(),
            vec![
                (global::RefreshFrame::DESCRIPTOR, 2),
                (tools_controller::Switch::DESCRIPTOR, 1),
            ]
        );

        let unwired = bus.unwired(&catalog::all_kinds());
        assert!(!unwired.contains(&tools_controller::Switch::DESCRIPTOR));
        assert!(unwired.contains(&environment_controller::Open::DESCRIPTOR));
        assert!(unwired.iter().all(|kind| kind.delivery.is_directed()));
    }

    #[test]
    fn test_registration_is_logged() {
        let (subscriber, handle) = subscriber::mock()
            .event(
                expect::event()
                    .at_level(tracing::Level::INFO)
                    .with_fields(expect::msg("Consumer registered")),
            )
            .event(
                expect::event()
                    .at_level(tracing::Level::ERROR)
                    .with_fields(expect::msg("Directed event already has a consumer")),
            )
            .only()
            .run_with_handle();

        tracing::subscriber::with_default(subscriber, || {
            let bus = DispatchBus::new();
            bus.register_consumer::<tools_controller::Switch, _>(|_| {})
                .unwrap();
            let _ = bus.register_consumer::<tools_controller::Switch, _>(|_| {});
        });

        handle.assert_finished();
    }

    #[test]
    fn test_publish_span() {
        let bus = DispatchBus::new();
        bus.register_consumer::<global::RefreshFrame, _>(|_| {})
            .unwrap();

        let (subscriber, handle) = subscriber::mock()
            .new_span(
                expect::span()
                    .named("publish")
                    .with_fields(expect::field("consumers").with_value(&1_u64)),
            )
            .enter(expect::span().named("publish"))
            .event(expect::event().with_fields(expect::msg("Dispatch finished")))
            .exit(expect::span().named("publish"))
            .drop_span(expect::span().named("publish"))
            .only()
            .run_with_handle();

        tracing::subscriber::with_default(subscriber, || {
            bus.publish(Event::<global::RefreshFrame>::new(())).unwrap();
        });

        handle.assert_finished();
    }

    #[test]
    fn test_slow_consumer_is_reported() {
        let bus = DispatchBus::new().with_slow_consumer_threshold(Duration::from_millis(1));
        bus.register_consumer::<global::RefreshFrame, _>(|_| {
            thread::sleep(Duration::from_millis(10));
        })
        .unwrap();

        let (subscriber, handle) = subscriber::mock()
            .new_span(expect::span().named("publish"))
            .enter(expect::span().named("publish"))
            .new_span(expect::span().named("perf_timer"))
            .event(
                expect::event()
                    .at_level(tracing::Level::WARN)
                    .with_fields(expect::msg("Slow operation detected")),
            )
            .drop_span(expect::span().named("perf_timer"))
            .event(expect::event().with_fields(expect::msg("Dispatch finished")))
            .exit(expect::span().named("publish"))
            .drop_span(expect::span().named("publish"))
            .only()
            .run_with_handle();

        tracing::subscriber::with_default(subscriber, || {
            bus.publish(Event::<global::RefreshFrame>::new(())).unwrap();
        });

        handle.assert_finished();
    }
}
