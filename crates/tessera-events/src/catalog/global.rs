// ABOUTME: Broadcast notifications about editor-wide state changes
// ABOUTME: Any component may consume them, in registration order

use std::collections::BTreeSet;
use tessera_types::{
    ActionStatus, Dme, DmeItemType, Dmm, MapPos, Shortcut, TileItem, ToolType,
};

crate::declare_events! {
    namespace = "global", broadcast;
    /// The environment is about to be replaced or closed, drop everything derived from it
    ResetEnvironment(());
    /// A new environment finished loading
    SwitchEnvironment(Dme);
    /// The active map changed
    SwitchMap(Dmm);
    /// A map was closed
    CloseMap(Dmm);
    MapMousePosChanged(MapPos);
    MapMouseDragStart(());
    MapMouseDragStop(());
    /// The composed frame must be rebuilt
    RefreshFrame(());
    ActionStatusChanged(ActionStatus);
    SwitchSelectedTileItem(TileItem);
    /// Item types currently hidden by the layers filter
    RefreshLayersFilter(BTreeSet<DmeItemType>);
    SwitchUsedTool(ToolType);
    TriggerShortcut(Shortcut);
}

/// State owned by one component, pushed to whoever wants to observe it.
///
/// Consumers keep what they receive; the owner stays the single writer.
pub mod provider {
    use tessera_types::{AbsoluteFilePath, Dmm, FrameMesh, SharedFlag, VisibleFilePath};

    crate::declare_events! {
        namespace = "global.provider", broadcast;
        InstanceLocatorOpen(SharedFlag);
        OpenedMaps(Vec<Dmm>);
        AvailableMaps(Vec<(AbsoluteFilePath, VisibleFilePath)>);
        ComposedFrame(Vec<FrameMesh>);
    }
}
