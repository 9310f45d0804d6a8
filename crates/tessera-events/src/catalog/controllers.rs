// ABOUTME: Operations owned by a single controller each
// ABOUTME: Publishing without the owning controller wired is a startup defect

pub mod environment_controller {
    use std::path::PathBuf;
    use tessera_types::Dme;

    crate::declare_events! {
        namespace = "environment_controller", directed;
        /// Load the environment at the path, replying whether it succeeded
        Open(PathBuf) => bool;
        /// Current environment; no reply while none is loaded
        Fetch(()) => Dme;
    }
}

pub mod map_holder_controller {
    use std::path::PathBuf;
    use tessera_types::{Dmm, MapId};

    crate::declare_events! {
        namespace = "map_holder_controller", directed;
        Open(PathBuf);
        Close(MapId);
        FetchSelected(()) => Option<Dmm>;
        /// Snapshot of every opened map, in opening order
        FetchOpened(()) => Vec<Dmm>;
        Switch(MapId);
        Save(());
    }
}

pub mod action_controller {
    use std::sync::Arc;
    use tessera_types::Undoable;

    crate::declare_events! {
        namespace = "action_controller", directed;
        AddAction(Arc<dyn Undoable>);
        UndoAction(());
        RedoAction(());
    }
}

pub mod canvas_controller {
    use tessera_types::{MapArea, MapPos};

    crate::declare_events! {
        namespace = "canvas_controller", directed;
        /// Block or unblock canvas interaction
        Block(bool);
        CenterPosition(MapPos);
        MarkPosition(MapPos);
        ResetMarkedPosition(());
        SelectTiles(Vec<MapPos>);
        ResetSelectedTiles(());
        SelectArea(MapArea);
        ResetSelectedArea(());
        HighlightSelectedArea(());
    }
}

pub mod instance_controller {
    use tessera_types::{MapPos, SearchRect, TileItem, TileItemId, TileItemType};

    crate::declare_events! {
        namespace = "instance_controller", directed;
        GenerateFromIconStates(TileItem) => ();
        GenerateFromDirections(TileItem) => ();
        FindPositionsByType((SearchRect, TileItemType)) => Vec<(TileItem, MapPos)>;
        FindPositionsById((SearchRect, TileItemId)) => Vec<(TileItem, MapPos)>;
    }
}

pub mod map_modifier_controller {
    use tessera_types::{MapPos, TileItem, TileItemType};

    crate::declare_events! {
        namespace = "map_modifier_controller", directed;
        ReplaceTypeInPositions((TileItemType, Vec<(TileItem, MapPos)>));
        ReplaceIdInPositions((TileItemType, Vec<(TileItem, MapPos)>));
        DeleteTypeInPositions(Vec<(TileItem, MapPos)>);
        DeleteIdInPositions(Vec<(TileItem, MapPos)>);
    }
}

pub mod layers_filter_controller {
    use std::collections::BTreeSet;
    use tessera_types::{DmeItemType, TileItemId};

    crate::declare_events! {
        namespace = "layers_filter_controller", directed;
        FilterById(Vec<TileItemId>);
        ShowByType(DmeItemType);
        HideByType(DmeItemType);
        /// Item types currently hidden
        Fetch(()) => BTreeSet<DmeItemType>;
    }
}

pub mod tools_controller {
    use tessera_types::ToolType;

    crate::declare_events! {
        namespace = "tools_controller", directed;
        Switch(ToolType);
    }
}
