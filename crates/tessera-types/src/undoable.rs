// ABOUTME: Contract for reversible editor actions stored in the action log
// ABOUTME: Concrete actions belong to the map modification layer

use std::fmt::Debug;

/// Reversible map modification
pub trait Undoable: Debug + Send + Sync {
    /// Revert the modification
    fn undo(&self);

    /// Reapply a modification that was undone
    fn redo(&self);

    /// Short label for logs and menus
    fn describe(&self) -> String {
        format!("{self:?}")
    }
}
