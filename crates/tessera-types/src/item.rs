// ABOUTME: Tile and tile item identifiers used by search, filtering and editing events
// ABOUTME: Item types are object paths such as "/obj/item"

use crate::map::MapPos;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Root object type of the environment tree (area, turf, obj, mob)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DmeItemType(Cow<'static, str>);

impl DmeItemType {
    pub const AREA: DmeItemType = DmeItemType(Cow::Borrowed("/area"));
    pub const TURF: DmeItemType = DmeItemType(Cow::Borrowed("/turf"));
    pub const OBJ: DmeItemType = DmeItemType(Cow::Borrowed("/obj"));
    pub const MOB: DmeItemType = DmeItemType(Cow::Borrowed("/mob"));

    pub fn new(path: impl Into<String>) -> Self {
        Self(Cow::Owned(path.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DmeItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique id of an item instance known to the environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileItemId(pub u64);

/// Full object path of a tile item, e.g. `/obj/item/wrench`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileItemType(pub String);

impl TileItemType {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Whether this type is `root` or one of its subtypes
    pub fn is_type_of(&self, root: &DmeItemType) -> bool {
        let root = root.as_str();
        self.0 == root
            || (self.0.starts_with(root) && self.0.as_bytes().get(root.len()) == Some(&b'/'))
    }
}

/// Item placed on a tile
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileItem {
    pub id: TileItemId,
    pub item_type: TileItemType,
}

impl TileItem {
    pub fn new(id: u64, item_type: impl Into<String>) -> Self {
        Self {
            id: TileItemId(id),
            item_type: TileItemType::new(item_type),
        }
    }
}

/// Index of an item inside a tile's item stack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileItemIdx(pub usize);

/// Snapshot of a tile and its item stack
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub pos: MapPos,
    pub items: Vec<TileItem>,
}
