// ABOUTME: Every event kind of the editor, grouped by namespace
// ABOUTME: "global" namespaces broadcast, the rest are owned by one controller or panel

mod controllers;
pub mod global;
mod panels;

pub use controllers::{
    action_controller, canvas_controller, environment_controller, instance_controller,
    layers_filter_controller, map_holder_controller, map_modifier_controller, tools_controller,
};
pub use panels::{
    available_maps_dialog_ui, edit_vars_dialog_ui, instance_locator_panel_ui,
    layers_filter_panel_ui, object_panel_ui, search_result_panel_ui, tile_popup_ui,
};

use crate::kind::KindDescriptor;

/// Kinds of every namespace, in declaration order
pub const NAMESPACES: &[&[KindDescriptor]] = &[
    global::KINDS,
    global::provider::KINDS,
    environment_controller::KINDS,
    map_holder_controller::KINDS,
    available_maps_dialog_ui::KINDS,
    tile_popup_ui::KINDS,
    edit_vars_dialog_ui::KINDS,
    action_controller::KINDS,
    canvas_controller::KINDS,
    object_panel_ui::KINDS,
    instance_controller::KINDS,
    search_result_panel_ui::KINDS,
    instance_locator_panel_ui::KINDS,
    map_modifier_controller::KINDS,
    layers_filter_panel_ui::KINDS,
    layers_filter_controller::KINDS,
    tools_controller::KINDS,
];

/// Flat list of the whole catalog
pub fn all_kinds() -> Vec<KindDescriptor> {
    NAMESPACES.iter().flat_map(|kinds| kinds.iter().copied()).collect()
}
