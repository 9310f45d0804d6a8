// ABOUTME: Keeps the list of opened maps and which one is selected
// ABOUTME: Sole consumer of the map_holder_controller namespace

use anyhow::{Context, Result};
use ignore::WalkBuilder;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tessera_core::catalog::{global, map_holder_controller};
use tessera_core::{BusAccess, BusError, BusHandle, EventConsumer};
use tessera_logging::{debug, error, info, warn};
use tessera_types::{AbsoluteFilePath, Dme, Dmm, MapId, VisibleFilePath};

use super::{Controller, broadcast};

/// Storage backend for map files
pub trait MapStore: Send + Sync {
    /// Normalize a requested path so the same file always compares equal
    fn resolve(&self, path: &Path) -> Result<PathBuf> {
        Ok(path.to_path_buf())
    }

    fn load(&self, id: MapId, path: &Path) -> Result<Dmm>;

    fn save(&self, map: &Dmm) -> Result<()>;

    /// Every map file below the environment root
    fn available_maps(&self, root: &Path) -> Result<Vec<PathBuf>>;
}

/// Store backed by the local file system.
///
/// Map contents are owned by the map model, so saving only checks the file is still there.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsMapStore;

impl MapStore for FsMapStore {
    fn resolve(&self, path: &Path) -> Result<PathBuf> {
        path.canonicalize()
            .with_context(|| format!("Map file not found: {}", path.display()))
    }

    fn load(&self, id: MapId, path: &Path) -> Result<Dmm> {
        Ok(Dmm::new(id, self.resolve(path)?))
    }

    fn save(&self, map: &Dmm) -> Result<()> {
        if !map.path.is_file() {
            anyhow::bail!("Map file disappeared: {}", map.path.display());
        }
        Ok(())
    }

    fn available_maps(&self, root: &Path) -> Result<Vec<PathBuf>> {
        if !root.is_dir() {
            anyhow::bail!("Environment root is not a directory: {}", root.display());
        }

        let mut walk_builder = WalkBuilder::new(root);
        walk_builder
            .hidden(false)
            .follow_links(true)
            .sort_by_file_name(|a, b| a.cmp(b));

        let mut maps = Vec::new();
        for entry in walk_builder.build() {
            // Unreadable directories and symlink loops are skipped, not fatal
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    debug!(error = %err, "Skipping map directory entry");
                    continue;
                }
            };
            let path = entry.path();
            if entry.file_type().is_some_and(|ft| ft.is_file())
                && path.extension().and_then(|ext| ext.to_str()) == Some("dmm")
            {
                maps.push(path.to_path_buf());
            }
        }
        Ok(maps)
    }
}

#[derive(Default)]
struct MapHolderState {
    opened: Vec<Dmm>,
    selected: Option<MapId>,
    next_id: u32,
    root: Option<PathBuf>,
}

impl MapHolderState {
    fn selected_map(&self) -> Option<Dmm> {
        let selected = self.selected?;
        self.opened.iter().find(|map| map.id == selected).cloned()
    }
}

#[derive(Clone)]
pub struct MapHolderController {
    bus: BusHandle,
    store: Arc<dyn MapStore>,
    state: Arc<Mutex<MapHolderState>>,
}

impl BusAccess for MapHolderController {
    fn bus(&self) -> &BusHandle {
        &self.bus
    }
}

impl MapHolderController {
    pub fn new(bus: BusHandle, store: Arc<dyn MapStore>) -> Self {
        Self {
            bus,
            store,
            state: Arc::new(Mutex::new(MapHolderState::default())),
        }
    }

    pub fn opened(&self) -> Vec<Dmm> {
        self.state.lock().opened.clone()
    }

    pub fn selected(&self) -> Option<Dmm> {
        self.state.lock().selected_map()
    }

    fn handle_open(&self, path: &Path) {
        let path = match self.store.resolve(path) {
            Ok(path) => path,
            Err(err) => {
                error!(path = %path.display(), error = %err, "Failed to open map");
                return;
            }
        };
        let existing = self
            .state
            .lock()
            .opened
            .iter()
            .find(|map| map.path == path)
            .map(|map| map.id);
        if let Some(id) = existing {
            debug!(map = %id, "Map already opened, switching to it");
            self.select(id);
            return;
        }

        let (id, root) = {
            let mut state = self.state.lock();
            state.next_id += 1;
            (MapId(state.next_id), state.root.clone())
        };

        let mut map = match self.store.load(id, &path) {
            Ok(map) => map,
            Err(err) => {
                error!(path = %path.display(), error = %err, "Failed to open map");
                return;
            }
        };
        if let Some(root) = root {
            map.visible_name = VisibleFilePath::relative_to(&map.path, &root).0;
        }

        info!(map = %id, name = %map.visible_name, "Map opened");
        let opened = {
            let mut state = self.state.lock();
            state.opened.push(map.clone());
            state.selected = Some(id);
            state.opened.clone()
        };

        broadcast::<global::SwitchMap>(self, map);
        broadcast::<global::provider::OpenedMaps>(self, opened);
    }

    fn handle_close(&self, id: MapId) {
        let (closed, next, opened) = {
            let mut state = self.state.lock();
            let Some(position) = state.opened.iter().position(|map| map.id == id) else {
                warn!(map = %id, "Close requested for a map that is not opened");
                return;
            };

            let closed = state.opened.remove(position);
            let mut next = None;
            if state.selected == Some(id) {
                next = state.opened.last().cloned();
                state.selected = next.as_ref().map(|map| map.id);
            }
            (closed, next, state.opened.clone())
        };

        info!(map = %id, "Map closed");
        broadcast::<global::CloseMap>(self, closed);
        if let Some(next) = next {
            broadcast::<global::SwitchMap>(self, next);
        }
        broadcast::<global::provider::OpenedMaps>(self, opened);
    }

    fn select(&self, id: MapId) {
        let map = {
            let mut state = self.state.lock();
            if state.selected == Some(id) {
                return;
            }
            let Some(map) = state.opened.iter().find(|map| map.id == id).cloned() else {
                warn!(map = %id, "Switch requested to a map that is not opened");
                return;
            };
            state.selected = Some(id);
            map
        };

        broadcast::<global::SwitchMap>(self, map);
    }

    fn handle_save(&self) {
        let Some(map) = self.selected() else {
            debug!("No selected map to save");
            return;
        };

        match self.store.save(&map) {
            Ok(()) => info!(map = %map.id, "Map saved"),
            Err(err) => error!(map = %map.id, error = %err, "Failed to save map"),
        }
    }

    fn handle_switch_environment(&self, dme: &Dme) {
        self.state.lock().root = Some(dme.root_path.clone());

        let maps = match self.store.available_maps(&dme.root_path) {
            Ok(maps) => maps,
            Err(err) => {
                warn!(error = %err, "Failed to list available maps");
                return;
            }
        };

        let available = maps
            .into_iter()
            .map(|path| {
                let visible = VisibleFilePath::relative_to(&path, &dme.root_path);
                (AbsoluteFilePath(path), visible)
            })
            .collect::<Vec<_>>();
        debug!(count = available.len(), "Available maps listed");
        broadcast::<global::provider::AvailableMaps>(self, available);
    }

    fn handle_reset(&self) {
        let closed = {
            let mut state = self.state.lock();
            state.selected = None;
            state.root = None;
            std::mem::take(&mut state.opened)
        };

        if closed.is_empty() {
            return;
        }
        for map in closed {
            broadcast::<global::CloseMap>(self, map);
        }
        broadcast::<global::provider::OpenedMaps>(self, Vec::new());
    }
}

impl Controller for MapHolderController {
    fn name(&self) -> &'static str {
        "map_holder_controller"
    }

    fn register(&self) -> Result<(), BusError> {
        let this = self.clone();
        self.consume_event::<map_holder_controller::Open, _>(move |event| {
            this.handle_open(event.body());
        })?;

        let this = self.clone();
        self.consume_event::<map_holder_controller::Close, _>(move |event| {
            this.handle_close(*event.body());
        })?;

        let this = self.clone();
        self.consume_event::<map_holder_controller::Switch, _>(move |event| {
            this.select(*event.body());
        })?;

        let this = self.clone();
        self.consume_event::<map_holder_controller::Save, _>(move |_| this.handle_save())?;

        let this = self.clone();
        self.consume_event::<map_holder_controller::FetchSelected, _>(move |event| {
            event.reply(this.selected());
        })?;

        let this = self.clone();
        self.consume_event::<map_holder_controller::FetchOpened, _>(move |event| {
            event.reply(this.opened());
        })?;

        let this = self.clone();
        self.consume_event::<global::SwitchEnvironment, _>(move |event| {
            this.handle_switch_environment(event.body());
        })?;

        let this = self.clone();
        self.consume_event::<global::ResetEnvironment, _>(move |_| this.handle_reset())?;
        Ok(())
    }
}
