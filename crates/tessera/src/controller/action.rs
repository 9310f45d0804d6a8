// ABOUTME: Per-map undo/redo history of reversible actions
// ABOUTME: Sole consumer of the action_controller namespace

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use tessera_core::catalog::{action_controller, global};
use tessera_core::{BusAccess, BusError, BusHandle, EventConsumer};
use tessera_logging::{debug, trace};
use tessera_types::{ActionStatus, MapId, Undoable};

use super::{Controller, broadcast};

#[derive(Default)]
struct ActionStack {
    undo: Vec<Arc<dyn Undoable>>,
    redo: Vec<Arc<dyn Undoable>>,
}

impl ActionStack {
    fn status(&self) -> ActionStatus {
        ActionStatus {
            has_undo_action: !self.undo.is_empty(),
            has_redo_action: !self.redo.is_empty(),
        }
    }
}

#[derive(Default)]
struct ActionState {
    stacks: HashMap<MapId, ActionStack>,
    current: Option<MapId>,
}

impl ActionState {
    fn status(&self) -> ActionStatus {
        self.current
            .and_then(|map| self.stacks.get(&map))
            .map(ActionStack::status)
            .unwrap_or_default()
    }

    fn current_stack(&mut self) -> Option<&mut ActionStack> {
        let map = self.current?;
        Some(self.stacks.entry(map).or_default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Undo,
    Redo,
}

#[derive(Clone)]
pub struct ActionController {
    bus: BusHandle,
    state: Arc<Mutex<ActionState>>,
}

impl BusAccess for ActionController {
    fn bus(&self) -> &BusHandle {
        &self.bus
    }
}

impl ActionController {
    pub fn new(bus: BusHandle) -> Self {
        Self {
            bus,
            state: Arc::new(Mutex::new(ActionState::default())),
        }
    }

    /// Undo/redo availability for the selected map
    pub fn status(&self) -> ActionStatus {
        self.state.lock().status()
    }

    fn add_action(&self, action: &Arc<dyn Undoable>) {
        let status = {
            let mut state = self.state.lock();
            let Some(stack) = state.current_stack() else {
                debug!(action = %action.describe(), "No selected map, action not recorded");
                return;
            };
            stack.undo.push(action.clone());
            stack.redo.clear();
            stack.status()
        };

        trace!(action = %action.describe(), "Action recorded");
        broadcast::<global::ActionStatusChanged>(self, status);
    }

    fn replay(&self, direction: Direction) {
        let action = {
            let mut state = self.state.lock();
            let Some(stack) = state.current_stack() else {
                return;
            };
            let popped = match direction {
                Direction::Undo => stack.undo.pop(),
                Direction::Redo => stack.redo.pop(),
            };
            let Some(action) = popped else {
                debug!(?direction, "Nothing to replay");
                return;
            };
            action
        };

        // Actions may publish while they run, so the lock is released first
        match direction {
            Direction::Undo => action.undo(),
            Direction::Redo => action.redo(),
        }
        debug!(?direction, action = %action.describe(), "Action replayed");

        let status = {
            let mut state = self.state.lock();
            let Some(stack) = state.current_stack() else {
                return;
            };
            match direction {
                Direction::Undo => stack.redo.push(action),
                Direction::Redo => stack.undo.push(action),
            }
            stack.status()
        };

        broadcast::<global::ActionStatusChanged>(self, status);
        broadcast::<global::RefreshFrame>(self, ());
    }

    fn switch_map(&self, map: Option<MapId>) {
        let status = {
            let mut state = self.state.lock();
            state.current = map;
            state.status()
        };
        broadcast::<global::ActionStatusChanged>(self, status);
    }

    fn close_map(&self, map: MapId) {
        let status = {
            let mut state = self.state.lock();
            state.stacks.remove(&map);
            if state.current != Some(map) {
                return;
            }
            state.current = None;
            state.status()
        };
        broadcast::<global::ActionStatusChanged>(self, status);
    }
}

impl Controller for ActionController {
    fn name(&self) -> &'static str {
        "action_controller"
    }

    fn register(&self) -> Result<(), BusError> {
        let this = self.clone();
        self.consume_event::<action_controller::AddAction, _>(move |event| {
            this.add_action(event.body());
        })?;

        let this = self.clone();
        self.consume_event::<action_controller::UndoAction, _>(move |_| {
            this.replay(Direction::Undo);
        })?;

        let this = self.clone();
        self.consume_event::<action_controller::RedoAction, _>(move |_| {
            this.replay(Direction::Redo);
        })?;

        let this = self.clone();
        self.consume_event::<global::SwitchMap, _>(move |event| {
            this.switch_map(Some(event.body().id));
        })?;

        let this = self.clone();
        self.consume_event::<global::CloseMap, _>(move |event| {
            this.close_map(event.body().id);
        })?;

        let this = self.clone();
        self.consume_event::<global::ResetEnvironment, _>(move |_| {
            this.state.lock().stacks.clear();
            this.switch_map(None);
        })?;
        Ok(())
    }
}
