// ABOUTME: Headless UI components that publish and consume catalog events
// ABOUTME: Rendering is left to the frontend; these models own state and wiring

pub mod menu;
pub mod menu_bar;
pub mod picker;
pub mod shortcuts;


pub use menu::{Layer, Menu, MenuAction, MenuEntry, MenuItem};
pub use menu_bar::{MenuBar, MenuBarState};
pub use picker::FilePicker;
pub use shortcuts::ShortcutMap;
