// ABOUTME: File selection seam between UI models and the native dialog
// ABOUTME: Frontends implement it; tests script it

use std::path::{Path, PathBuf};

/// Native "open file" dialog
pub trait FilePicker: Send + Sync {
    /// Ask the user for a file with the given extension, optionally starting in `root`.
    ///
    /// Returns `None` when the dialog was cancelled.
    fn select_file(&self, extension: &str, root: Option<&Path>) -> Option<PathBuf>;
}

impl<F> FilePicker for F
where
    F: Fn(&str, Option<&Path>) -> Option<PathBuf> + Send + Sync,
{
    fn select_file(&self, extension: &str, root: Option<&Path>) -> Option<PathBuf> {
        self(extension, root)
    }
}
