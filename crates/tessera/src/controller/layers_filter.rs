// ABOUTME: Tracks which item types and item ids are hidden from the canvas
// ABOUTME: Sole consumer of the layers_filter_controller namespace

use parking_lot::RwLock;
use std::collections::BTreeSet;
use std::sync::Arc;

use tessera_core::catalog::{global, layers_filter_controller};
use tessera_core::{BusAccess, BusError, BusHandle, EventConsumer};
use tessera_logging::debug;
use tessera_types::{DmeItemType, TileItem, TileItemId};

use super::{Controller, broadcast};

#[derive(Default)]
struct FilterState {
    hidden_types: BTreeSet<DmeItemType>,
    filtered_ids: BTreeSet<TileItemId>,
}

#[derive(Clone)]
pub struct LayersFilterController {
    bus: BusHandle,
    state: Arc<RwLock<FilterState>>,
}

impl BusAccess for LayersFilterController {
    fn bus(&self) -> &BusHandle {
        &self.bus
    }
}

impl LayersFilterController {
    pub fn new(bus: BusHandle) -> Self {
        Self {
            bus,
            state: Arc::new(RwLock::new(FilterState::default())),
        }
    }

    pub fn hidden_types(&self) -> BTreeSet<DmeItemType> {
        self.state.read().hidden_types.clone()
    }

    /// Whether the renderer should draw `item`
    pub fn is_visible(&self, item: &TileItem) -> bool {
        let state = self.state.read();
        !state.filtered_ids.contains(&item.id)
            && !state
                .hidden_types
                .iter()
                .any(|hidden| item.item_type.is_type_of(hidden))
    }

    fn set_type_hidden(&self, item_type: &DmeItemType, hidden: bool) {
        let hidden_types = {
            let mut state = self.state.write();
            let changed = if hidden {
                state.hidden_types.insert(item_type.clone())
            } else {
                state.hidden_types.remove(item_type)
            };
            if !changed {
                return;
            }
            state.hidden_types.clone()
        };

        debug!(%item_type, hidden, "Layer visibility changed");
        broadcast::<global::RefreshLayersFilter>(self, hidden_types);
        broadcast::<global::RefreshFrame>(self, ());
    }

    fn filter_by_id(&self, ids: &[TileItemId]) {
        self.state.write().filtered_ids = ids.iter().copied().collect();
        debug!(count = ids.len(), "Item id filter updated");
        broadcast::<global::RefreshFrame>(self, ());
    }

    fn reset(&self) {
        let had_hidden = {
            let mut state = self.state.write();
            state.filtered_ids.clear();
            let had_hidden = !state.hidden_types.is_empty();
            state.hidden_types.clear();
            had_hidden
        };

        if had_hidden {
            broadcast::<global::RefreshLayersFilter>(self, BTreeSet::new());
        }
    }
}

impl Controller for LayersFilterController {
    fn name(&self) -> &'static str {
        "layers_filter_controller"
    }

    fn register(&self) -> Result<(), BusError> {
        let this = self.clone();
        self.consume_event::<layers_filter_controller::FilterById, _>(move |event| {
            this.filter_by_id(event.body());
        })?;

        let this = self.clone();
        self.consume_event::<layers_filter_controller::ShowByType, _>(move |event| {
            this.set_type_hidden(event.body(), false);
        })?;

        let this = self.clone();
        self.consume_event::<layers_filter_controller::HideByType, _>(move |event| {
            this.set_type_hidden(event.body(), true);
        })?;

        let this = self.clone();
        self.consume_event::<layers_filter_controller::Fetch, _>(move |event| {
            event.reply(this.hidden_types());
        })?;

        let this = self.clone();
        self.consume_event::<global::ResetEnvironment, _>(move |_| this.reset())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use tessera_core::Event;

    fn fixture() -> (BusHandle, LayersFilterController, Arc<Mutex<Vec<usize>>>) {
        let bus = BusHandle::default();
        let controller = LayersFilterController::new(bus.clone());
        controller.register().unwrap();

        let refreshes = Arc::new(Mutex::new(Vec::new()));
        let sink = refreshes.clone();
        bus.register_consumer::<global::RefreshLayersFilter, _>(move |event| {
            sink.lock().push(event.body().len());
        })
        .unwrap();
        (bus, controller, refreshes)
    }

    #[test]
    fn test_hide_and_show_types() {
        let (bus, controller, refreshes) = fixture();
        bus.publish(Event::<layers_filter_controller::HideByType>::new(DmeItemType::OBJ))
            .unwrap();
        bus.publish(Event::<layers_filter_controller::HideByType>::new(DmeItemType::OBJ))
            .unwrap();
        bus.publish(Event::<layers_filter_controller::HideByType>::new(DmeItemType::MOB))
            .unwrap();
        bus.publish(Event::<layers_filter_controller::ShowByType>::new(DmeItemType::OBJ))
            .unwrap();

        // Hiding an already hidden type is not a change
        assert_eq!(*refreshes.lock(), vec![1, 2, 1]);
        let hidden = bus.request::<layers_filter_controller::Fetch>(()).unwrap();
        assert_eq!(hidden, Some([DmeItemType::MOB].into_iter().collect()));
        assert_eq!(controller.hidden_types().len(), 1);
    }

    #[test]
    fn test_visibility_by_type_and_id() {
        let (bus, controller, _) = fixture();
        let wrench = TileItem::new(5, "/obj/item/wrench");
        let floor = TileItem::new(6, "/turf/floor");

        bus.publish(Event::<layers_filter_controller::HideByType>::new(DmeItemType::OBJ))
            .unwrap();
        assert!(!controller.is_visible(&wrench));
        assert!(controller.is_visible(&floor));

        bus.publish(Event::<layers_filter_controller::FilterById>::new(vec![TileItemId(6)]))
            .unwrap();
        assert!(!controller.is_visible(&floor));
    }

    #[test]
    fn test_reset_environment_shows_everything() {
        let (bus, controller, refreshes) = fixture();
        bus.publish(Event::<layers_filter_controller::HideByType>::new(DmeItemType::AREA))
            .unwrap();
        bus.publish(Event::<global::ResetEnvironment>::new(()))
            .unwrap();

        assert_eq!(*refreshes.lock(), vec![1, 0]);
        assert!(controller.hidden_types().is_empty());
    }
}
