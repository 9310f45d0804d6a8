// ABOUTME: Requests addressed to a single UI panel or dialog

pub mod available_maps_dialog_ui {
    crate::declare_events! {
        namespace = "available_maps_dialog_ui", directed;
        Open(());
    }
}

pub mod tile_popup_ui {
    use tessera_types::Tile;

    crate::declare_events! {
        namespace = "tile_popup_ui", directed;
        Open(Tile);
        Close(());
    }
}

pub mod edit_vars_dialog_ui {
    use tessera_types::{Tile, TileItem, TileItemIdx};

    crate::declare_events! {
        namespace = "edit_vars_dialog_ui", directed;
        OpenWithTile((Tile, TileItemIdx));
        OpenWithTileItem(TileItem);
    }
}

pub mod object_panel_ui {
    crate::declare_events! {
        namespace = "object_panel_ui", directed;
        Update(());
    }
}

pub mod search_result_panel_ui {
    use tessera_types::SearchResult;

    crate::declare_events! {
        namespace = "search_result_panel_ui", directed;
        Open(SearchResult);
    }
}

pub mod instance_locator_panel_ui {
    use tessera_types::{TileItemId, TileItemType};

    crate::declare_events! {
        namespace = "instance_locator_panel_ui", directed;
        SearchByType(TileItemType);
        SearchById(TileItemId);
    }
}

pub mod layers_filter_panel_ui {
    crate::declare_events! {
        namespace = "layers_filter_panel_ui", directed;
        Open(());
    }
}
