// ABOUTME: Small state snapshots exchanged between controllers and UI panels
// ABOUTME: Action status, tool selection, shortcuts and search descriptors

use crate::item::TileItem;
use crate::map::MapPos;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Availability of undo and redo in the action log
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionStatus {
    pub has_undo_action: bool,
    pub has_redo_action: bool,
}

/// Editing tool currently used on the canvas
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolType {
    #[default]
    Tile,
    Select,
}

/// Key combination that was pressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Shortcut {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    /// Lowercase key character
    pub key: char,
}

impl Shortcut {
    pub fn key(key: char) -> Self {
        Self {
            ctrl: false,
            shift: false,
            alt: false,
            key: key.to_ascii_lowercase(),
        }
    }

    pub fn ctrl(key: char) -> Self {
        Self {
            ctrl: true,
            ..Self::key(key)
        }
    }

    pub fn ctrl_shift(key: char) -> Self {
        Self {
            shift: true,
            ..Self::ctrl(key)
        }
    }
}

impl fmt::Display for Shortcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ctrl {
            f.write_str("Ctrl+")?;
        }
        if self.shift {
            f.write_str("Shift+")?;
        }
        if self.alt {
            f.write_str("Alt+")?;
        }
        write!(f, "{}", self.key.to_ascii_uppercase())
    }
}

/// Boolean owned by one component and observed by others through a provider event
#[derive(Debug, Clone, Default)]
pub struct SharedFlag(Arc<AtomicBool>);

impl SharedFlag {
    pub fn new(value: bool) -> Self {
        Self(Arc::new(AtomicBool::new(value)))
    }

    pub fn get(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn set(&self, value: bool) {
        self.0.store(value, Ordering::Release);
    }

    /// Flip the flag and return the new value
    pub fn toggle(&self) -> bool {
        !self.0.fetch_xor(true, Ordering::AcqRel)
    }
}

/// Renderable quad of the composed frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameMesh {
    pub item: TileItem,
    pub pos: MapPos,
    pub depth: f32,
}

/// Inclusive search bounds on the current z-level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRect {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
}

/// Result list shown by the search panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub query: String,
    pub positions: Vec<(TileItem, MapPos)>,
}
