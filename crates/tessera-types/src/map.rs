// ABOUTME: Handles for environments, maps and positions inside a map
// ABOUTME: The map data model itself lives outside the messaging layer

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Position of a tile inside a map, 1-based like the map format itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MapPos {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

impl MapPos {
    pub const fn new(x: u32, y: u32, z: u32) -> Self {
        Self { x, y, z }
    }
}

impl fmt::Display for MapPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Rectangular area on a single z-level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MapArea {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
}

impl MapArea {
    /// Build an area from two corners given in any order
    pub fn from_corners(a: MapPos, b: MapPos) -> Self {
        Self {
            x1: a.x.min(b.x),
            y1: a.y.min(b.y),
            x2: a.x.max(b.x),
            y2: a.y.max(b.y),
        }
    }

    pub fn contains(&self, pos: MapPos) -> bool {
        (self.x1..=self.x2).contains(&pos.x) && (self.y1..=self.y2).contains(&pos.y)
    }
}

/// Identifier of an opened map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MapId(pub u32);

impl fmt::Display for MapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "map#{}", self.0)
    }
}

/// Loaded environment (`.dme`) handle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dme {
    pub name: String,
    pub root_path: PathBuf,
}

impl Dme {
    pub fn new(name: impl Into<String>, root_path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            root_path: root_path.into(),
        }
    }
}

/// Opened map (`.dmm`) handle
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dmm {
    pub id: MapId,
    pub path: PathBuf,
    pub visible_name: String,
}

impl Dmm {
    pub fn new(id: MapId, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let visible_name = visible_name_of(&path);
        Self {
            id,
            path,
            visible_name,
        }
    }
}

/// Absolute path of a map file on disk
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AbsoluteFilePath(pub PathBuf);

/// Path of a map file as shown to the user, relative to the environment root
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VisibleFilePath(pub String);

impl VisibleFilePath {
    /// Relative path with forward slashes, or the file name when the path is outside `root`
    pub fn relative_to(path: &Path, root: &Path) -> Self {
        match path.strip_prefix(root) {
            Ok(relative) => Self(relative.to_string_lossy().replace('\\', "/")),
            Err(_) => Self(visible_name_of(path)),
        }
    }
}

fn visible_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area_from_corners_normalizes() {
        let area = MapArea::from_corners(MapPos::new(5, 1, 1), MapPos::new(2, 7, 1));
        assert_eq!(
            area,
            MapArea {
                x1: 2,
                y1: 1,
                x2: 5,
                y2: 7
            }
        );
        assert!(area.contains(MapPos::new(3, 3, 1)));
        assert!(!area.contains(MapPos::new(6, 3, 1)));
    }

    #[test]
    fn test_dmm_visible_name() {
        let dmm = Dmm::new(MapId(1), "/station/maps/box.dmm");
        assert_eq!(dmm.visible_name, "box.dmm");
    }

    #[test]
    fn test_visible_file_path() {
        let root = Path::new("/station");
        let inside = VisibleFilePath::relative_to(Path::new("/station/maps/box.dmm"), root);
        assert_eq!(inside.0, "maps/box.dmm");

        let outside = VisibleFilePath::relative_to(Path::new("/elsewhere/meta.dmm"), root);
        assert_eq!(outside.0, "meta.dmm");
    }
}
