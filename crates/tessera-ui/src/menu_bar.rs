// ABOUTME: Main menu model: environment, map, undo/redo and layer actions
// ABOUTME: Keeps its state in sync through global broadcasts and drives controllers

use parking_lot::Mutex;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tessera_core::catalog::{
    action_controller, available_maps_dialog_ui, environment_controller, global,
    layers_filter_controller, layers_filter_panel_ui, map_holder_controller,
};
use tessera_core::{BusAccess, BusError, BusHandle, Event, EventConsumer, EventSender};
use tessera_logging::{debug, info, warn};
use tessera_types::{ActionStatus, DmeItemType, Shortcut};

use crate::menu::{Layer, Menu, MenuAction, MenuEntry, MenuItem};
use crate::picker::FilePicker;
use crate::shortcuts::ShortcutMap;

const SPINNER: [char; 4] = ['|', '/', '-', '\\'];
const SPINNER_STEP: Duration = Duration::from_millis(250);

/// Everything the menu needs to render itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuBarState {
    /// Set while an environment is loading
    pub progress_text: Option<String>,
    pub environment_opened: bool,
    pub undo_enabled: bool,
    pub redo_enabled: bool,
    pub area_visible: bool,
    pub turf_visible: bool,
    pub obj_visible: bool,
    pub mob_visible: bool,
}

impl Default for MenuBarState {
    fn default() -> Self {
        Self {
            progress_text: None,
            environment_opened: false,
            undo_enabled: false,
            redo_enabled: false,
            area_visible: true,
            turf_visible: true,
            obj_visible: true,
            mob_visible: true,
        }
    }
}

impl MenuBarState {
    pub fn layer_visible(&self, layer: Layer) -> bool {
        match layer {
            Layer::Area => self.area_visible,
            Layer::Turf => self.turf_visible,
            Layer::Obj => self.obj_visible,
            Layer::Mob => self.mob_visible,
        }
    }

    fn layer_visible_mut(&mut self, layer: Layer) -> &mut bool {
        match layer {
            Layer::Area => &mut self.area_visible,
            Layer::Turf => &mut self.turf_visible,
            Layer::Obj => &mut self.obj_visible,
            Layer::Mob => &mut self.mob_visible,
        }
    }

    /// Whether `action` can currently run
    pub fn is_enabled(&self, action: MenuAction) -> bool {
        match action {
            MenuAction::OpenEnvironment => self.progress_text.is_none(),
            MenuAction::Undo => self.undo_enabled,
            MenuAction::Redo => self.redo_enabled,
            MenuAction::OpenMap
            | MenuAction::OpenAvailableMap
            | MenuAction::Save
            | MenuAction::OpenLayersFilter
            | MenuAction::ToggleLayer(_) => self.environment_opened,
        }
    }
}

/// Headless main menu.
///
/// Cloning is cheap and every clone shares the same state. The state lock is
/// never held while publishing, since consumers may broadcast back to the menu.
#[derive(Clone)]
pub struct MenuBar {
    bus: BusHandle,
    picker: Arc<dyn FilePicker>,
    shortcuts: Arc<ShortcutMap>,
    default_root: Option<PathBuf>,
    state: Arc<Mutex<MenuBarState>>,
}

impl BusAccess for MenuBar {
    fn bus(&self) -> &BusHandle {
        &self.bus
    }
}

impl MenuBar {
    pub fn new(bus: BusHandle, picker: Arc<dyn FilePicker>) -> Self {
        Self {
            bus,
            picker,
            shortcuts: Arc::new(ShortcutMap::menu_bar()),
            default_root: None,
            state: Arc::new(Mutex::new(MenuBarState::default())),
        }
    }

    /// Directory the environment picker starts in
    pub fn with_default_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.default_root = Some(root.into());
        self
    }

    /// Subscribe to the global broadcasts the menu reflects
    pub fn register(&self) -> Result<(), BusError> {
        let state = self.state.clone();
        self.consume_event::<global::ResetEnvironment, _>(move |_| {
            state.lock().environment_opened = false;
        })?;

        let state = self.state.clone();
        self.consume_event::<global::ActionStatusChanged, _>(move |event| {
            let status: &ActionStatus = event.body();
            let mut state = state.lock();
            state.undo_enabled = status.has_undo_action;
            state.redo_enabled = status.has_redo_action;
        })?;

        let state = self.state.clone();
        self.consume_event::<global::RefreshLayersFilter, _>(move |event| {
            let hidden: &BTreeSet<DmeItemType> = event.body();
            let mut state = state.lock();
            for layer in Layer::ALL {
                *state.layer_visible_mut(layer) = !hidden.contains(&layer.item_type());
            }
        })?;

        let menu = self.clone();
        self.consume_event::<global::TriggerShortcut, _>(move |event| {
            menu.handle_shortcut(event.body());
        })?;

        debug!("Menu bar registered");
        Ok(())
    }

    pub fn state(&self) -> MenuBarState {
        self.state.lock().clone()
    }

    pub fn progress_text(&self) -> Option<String> {
        self.state.lock().progress_text.clone()
    }

    /// Animated progress line, e.g. `/ Loading station.dme.`
    pub fn progress_indicator(&self, elapsed: Duration) -> Option<String> {
        let text = self.progress_text()?;
        let frame = (elapsed.as_millis() / SPINNER_STEP.as_millis()) as usize & 3;
        Some(format!("{} {}{}", SPINNER[frame], text, ".".repeat(frame)))
    }

    /// Run the action bound to `shortcut`, if any. Failures are logged.
    pub fn handle_shortcut(&self, shortcut: &Shortcut) {
        let Some(action) = self.shortcuts.action(shortcut) else {
            return;
        };

        debug!(%shortcut, ?action, "Menu shortcut triggered");
        if let Err(err) = self.perform(action) {
            warn!(error = %err, ?action, "Menu action failed");
        }
    }

    /// Run a menu action. Actions disabled by the current state do nothing.
    pub fn perform(&self, action: MenuAction) -> Result<(), BusError> {
        if !self.state.lock().is_enabled(action) {
            debug!(?action, "Ignoring disabled menu action");
            return Ok(());
        }

        match action {
            MenuAction::OpenEnvironment => self.open_environment(),
            MenuAction::OpenMap => self.open_map(),
            MenuAction::OpenAvailableMap => {
                self.send_event(Event::<available_maps_dialog_ui::Open>::new(()))
            }
            MenuAction::Save => self.send_event(Event::<map_holder_controller::Save>::new(())),
            MenuAction::Undo => self.send_event(Event::<action_controller::UndoAction>::new(())),
            MenuAction::Redo => self.send_event(Event::<action_controller::RedoAction>::new(())),
            MenuAction::OpenLayersFilter => {
                self.send_event(Event::<layers_filter_panel_ui::Open>::new(()))
            }
            MenuAction::ToggleLayer(layer) => self.toggle_layer(layer),
        }
    }

    fn open_environment(&self) -> Result<(), BusError> {
        let Some(file) = self.picker.select_file("dme", self.default_root.as_deref()) else {
            return Ok(());
        };

        info!(path = %file.display(), "Opening environment");
        self.state.lock().progress_text = Some(format!("Loading {}", file_label(&file)));

        let state = self.state.clone();
        let result = self.send_event(Event::<environment_controller::Open>::with_reply(
            file,
            move |opened| {
                let mut state = state.lock();
                state.progress_text = None;
                state.environment_opened = opened;
            },
        ));

        // Dispatch is synchronous, so loading is over whether or not the controller replied
        self.state.lock().progress_text = None;
        result
    }

    fn open_map(&self) -> Result<(), BusError> {
        let Some(environment) = self.request::<environment_controller::Fetch>(())? else {
            debug!("No environment to open a map from");
            return Ok(());
        };

        match self.picker.select_file("dmm", Some(&environment.root_path)) {
            Some(path) => self.send_event(Event::<map_holder_controller::Open>::new(path)),
            None => Ok(()),
        }
    }

    fn toggle_layer(&self, layer: Layer) -> Result<(), BusError> {
        let visible = {
            let mut state = self.state.lock();
            let visible = state.layer_visible_mut(layer);
            *visible = !*visible;
            *visible
        };

        let item_type = layer.item_type();
        if visible {
            self.send_event(Event::<layers_filter_controller::ShowByType>::new(item_type))
        } else {
            self.send_event(Event::<layers_filter_controller::HideByType>::new(item_type))
        }
    }

    /// File, Edit and Layers menus reflecting the current state
    pub fn menus(&self) -> Vec<Menu> {
        let state = self.state();
        let item = |label, action| {
            let item = MenuItem::new(label, action, state.is_enabled(action));
            match self.shortcuts.shortcut_for(action) {
                Some(shortcut) => item.with_shortcut(shortcut),
                None => item,
            }
        };

        let file = Menu {
            title: "File",
            entries: vec![
                MenuEntry::Item(item("Open Environment...", MenuAction::OpenEnvironment)),
                MenuEntry::Separator,
                MenuEntry::Item(item("Open Map...", MenuAction::OpenMap)),
                MenuEntry::Item(item("Open Available Map", MenuAction::OpenAvailableMap)),
                MenuEntry::Separator,
                MenuEntry::Item(item("Save", MenuAction::Save)),
            ],
        };

        let edit = Menu {
            title: "Edit",
            entries: vec![
                MenuEntry::Item(item("Undo", MenuAction::Undo)),
                MenuEntry::Item(item("Redo", MenuAction::Redo)),
            ],
        };

        let mut layers = vec![MenuEntry::Item(item(
            "Layers Filter",
            MenuAction::OpenLayersFilter,
        ))];
        layers.extend(Layer::ALL.into_iter().map(|layer| {
            MenuEntry::Item(
                item(layer.label(), MenuAction::ToggleLayer(layer))
                    .with_selected(state.layer_visible(layer)),
            )
        }));

        vec![
            file,
            edit,
            Menu {
                title: "Layers",
                entries: layers,
            },
        ]
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
