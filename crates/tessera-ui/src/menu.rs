// ABOUTME: Renderer-agnostic description of the main menu
// ABOUTME: Frontends draw these entries and route clicks back as MenuAction values

use tessera_types::{DmeItemType, Shortcut};

/// Item layer that can be shown or hidden from the Layers menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    Area,
    Turf,
    Obj,
    Mob,
}

impl Layer {
    pub const ALL: [Layer; 4] = [Layer::Area, Layer::Turf, Layer::Obj, Layer::Mob];

    pub fn item_type(self) -> DmeItemType {
        match self {
            Layer::Area => DmeItemType::AREA,
            Layer::Turf => DmeItemType::TURF,
            Layer::Obj => DmeItemType::OBJ,
            Layer::Mob => DmeItemType::MOB,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Layer::Area => "Area",
            Layer::Turf => "Turf",
            Layer::Obj => "Object",
            Layer::Mob => "Mob",
        }
    }

    /// Ctrl+1 through Ctrl+4, in menu order
    pub fn shortcut(self) -> Shortcut {
        let key = match self {
            Layer::Area => '1',
            Layer::Turf => '2',
            Layer::Obj => '3',
            Layer::Mob => '4',
        };
        Shortcut::ctrl(key)
    }
}

/// Something the user can trigger from the menu or a shortcut
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuAction {
    OpenEnvironment,
    OpenMap,
    OpenAvailableMap,
    Save,
    Undo,
    Redo,
    OpenLayersFilter,
    ToggleLayer(Layer),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub label: &'static str,
    pub action: MenuAction,
    pub shortcut: Option<Shortcut>,
    pub enabled: bool,
    /// Check mark state for toggle items, `None` for plain items
    pub selected: Option<bool>,
}

impl MenuItem {
    pub(crate) fn new(label: &'static str, action: MenuAction, enabled: bool) -> Self {
        Self {
            label,
            action,
            shortcut: None,
            enabled,
            selected: None,
        }
    }

    pub(crate) fn with_shortcut(mut self, shortcut: Shortcut) -> Self {
        self.shortcut = Some(shortcut);
        self
    }

    pub(crate) fn with_selected(mut self, selected: bool) -> Self {
        self.selected = Some(selected);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEntry {
    Item(MenuItem),
    Separator,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Menu {
    pub title: &'static str,
    pub entries: Vec<MenuEntry>,
}

impl Menu {
    pub fn items(&self) -> impl Iterator<Item = &MenuItem> {
        self.entries.iter().filter_map(|entry| match entry {
            MenuEntry::Item(item) => Some(item),
            MenuEntry::Separator => None,
        })
    }

    pub fn item(&self, action: MenuAction) -> Option<&MenuItem> {
        self.items().find(|item| item.action == action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_item_types() {
        let types: Vec<_> = Layer::ALL.iter().map(|layer| layer.item_type()).collect();
        assert_eq!(
            types,
            vec![
                DmeItemType::AREA,
                DmeItemType::TURF,
                DmeItemType::OBJ,
                DmeItemType::MOB
            ]
        );
        assert_eq!(Layer::Obj.shortcut().to_string(), "Ctrl+3");
    }

    #[test]
    fn test_menu_lookup_skips_separators() {
        let menu = Menu {
            title: "Edit",
            entries: vec![
                MenuEntry::Item(MenuItem::new("Undo", MenuAction::Undo, true)),
                MenuEntry::Separator,
                MenuEntry::Item(MenuItem::new("Redo", MenuAction::Redo, false)),
            ],
        };

        assert_eq!(menu.items().count(), 2);
        assert!(!menu.item(MenuAction::Redo).unwrap().enabled);
        assert!(menu.item(MenuAction::Save).is_none());
    }
}
