// ABOUTME: Wiring defects detected by the dispatch bus
// ABOUTME: Never retried; they propagate to the top-level handler

use tessera_events::KindDescriptor;

/// Cardinality violation on a directed event kind
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BusError {
    #[error("directed event {kind} already has a consumer")]
    DuplicateConsumer { kind: KindDescriptor },

    #[error("directed event {kind} was published with no consumer registered")]
    NoConsumer { kind: KindDescriptor },

    #[error("directed event {kind} has {count} consumers registered")]
    MultipleConsumers { kind: KindDescriptor, count: usize },
}

impl BusError {
    pub fn kind(&self) -> KindDescriptor {
        match self {
            BusError::DuplicateConsumer { kind }
            | BusError::NoConsumer { kind }
            | BusError::MultipleConsumers { kind, .. } => *kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_events::EventKind;
    use tessera_events::catalog::map_holder_controller;

    #[test]
    fn test_multiple_consumers_reports_kind_and_count() {
        let kind = map_holder_controller::Open::DESCRIPTOR;
        let err = BusError::MultipleConsumers { kind, count: 2 };

        assert_eq!(err.kind(), kind);
        assert_eq!(
            err.to_string(),
            format!("directed event {kind} has 2 consumers registered")
        );
    }

    #[test]
    fn test_kind_of_every_variant() {
        let kind = map_holder_controller::Save::DESCRIPTOR;
        assert_eq!(BusError::DuplicateConsumer { kind }.kind(), kind);
        assert_eq!(BusError::NoConsumer { kind }.kind(), kind);
    }
}
