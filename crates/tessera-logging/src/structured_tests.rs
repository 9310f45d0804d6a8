// ABOUTME: Tests for structured logging field validation using tracing-mock
// ABOUTME: Verifies the field shapes the editor logs for dispatch and wiring

#[cfg(test)]
mod tests {
    use crate::{debug, error, info, warn};
    use tracing_mock::{expect, subscriber};

    #[test]
    fn test_event_fields_are_recorded() {
        let (subscriber, handle) = subscriber::mock()
            .event(
                expect::event().at_level(tracing::Level::INFO).with_fields(
                    expect::field("kind")
                        .with_value(&"tools_controller::Switch")
                        .and(expect::field("consumers").with_value(&1_u64))
                        .and(expect::msg("Consumer registered")),
                ),
            )
            .only()
            .run_with_handle();

        tracing::subscriber::with_default(subscriber, || {
            info!(
                kind = "tools_controller::Switch",
                consumers = 1_u64,
                "Consumer registered"
            );
        });

        handle.assert_finished();
    }

    #[test]
    fn test_levels_are_preserved_in_order() {
        let (subscriber, handle) = subscriber::mock()
            .event(expect::event().at_level(tracing::Level::DEBUG))
            .event(expect::event().at_level(tracing::Level::WARN))
            .event(expect::event().at_level(tracing::Level::ERROR))
            .only()
            .run_with_handle();

        tracing::subscriber::with_default(subscriber, || {
            debug!("Dispatching event");
            warn!("Slow consumer");
            error!("Directed event has no consumer");
        });

        handle.assert_finished();
    }

    #[test]
    fn test_span_with_kind_field() {
        let (subscriber, handle) = subscriber::mock()
            .new_span(
                expect::span()
                    .named("publish")
                    .with_fields(expect::field("kind").with_value(&"global::RefreshFrame")),
            )
            .enter(expect::span().named("publish"))
            .event(expect::event().with_fields(expect::msg("Inside dispatch")))
            .exit(expect::span().named("publish"))
            .drop_span(expect::span().named("publish"))
            .only()
            .run_with_handle();

        tracing::subscriber::with_default(subscriber, || {
            let span = tracing::span!(tracing::Level::DEBUG, "publish", kind = "global::RefreshFrame");
            let _guard = span.enter();
            info!("Inside dispatch");
        });

        handle.assert_finished();
    }
}
