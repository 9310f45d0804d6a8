// ABOUTME: Keyboard shortcut table mapping key combinations to menu actions
// ABOUTME: Fed by the global TriggerShortcut broadcast

use std::collections::HashMap;
use tessera_types::Shortcut;

use crate::menu::{Layer, MenuAction};

#[derive(Debug, Clone, Default)]
pub struct ShortcutMap {
    bindings: HashMap<Shortcut, MenuAction>,
}

impl ShortcutMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bindings of the main menu
    pub fn menu_bar() -> Self {
        let mut map = Self::new();
        map.bind(Shortcut::ctrl('o'), MenuAction::OpenMap);
        map.bind(Shortcut::ctrl_shift('o'), MenuAction::OpenAvailableMap);
        map.bind(Shortcut::ctrl('s'), MenuAction::Save);
        map.bind(Shortcut::ctrl('z'), MenuAction::Undo);
        map.bind(Shortcut::ctrl_shift('z'), MenuAction::Redo);
        for layer in Layer::ALL {
            map.bind(layer.shortcut(), MenuAction::ToggleLayer(layer));
        }
        map
    }

    /// Bind `shortcut`, returning the action it replaced
    pub fn bind(&mut self, shortcut: Shortcut, action: MenuAction) -> Option<MenuAction> {
        self.bindings.insert(shortcut, action)
    }

    pub fn action(&self, shortcut: &Shortcut) -> Option<MenuAction> {
        self.bindings.get(shortcut).copied()
    }

    /// First shortcut bound to `action`, for display next to menu items
    pub fn shortcut_for(&self, action: MenuAction) -> Option<Shortcut> {
        self.bindings
            .iter()
            .filter(|(_, bound)| **bound == action)
            .map(|(shortcut, _)| *shortcut)
            .min_by_key(|shortcut| (shortcut.shift, shortcut.alt, shortcut.key))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
