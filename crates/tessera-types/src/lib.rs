// ABOUTME: Pure data types carried as event payloads, no cross-crate dependencies
// ABOUTME: Foundation layer for all other tessera crates

pub mod item;
pub mod map;
pub mod status;
pub mod undoable;

// Re-export commonly used types
pub use item::{DmeItemType, Tile, TileItem, TileItemId, TileItemIdx, TileItemType};
pub use map::{AbsoluteFilePath, Dme, Dmm, MapArea, MapId, MapPos, VisibleFilePath};
pub use status::{
    ActionStatus, FrameMesh, SearchRect, SearchResult, SharedFlag, Shortcut, ToolType,
};
pub use undoable::Undoable;
