//! Application state.
//!
//! Shared state for all request handlers.

use std::path::{Path, PathBuf};

use crate::live_reload::ChangeFlag;

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Raised by the watcher, consumed by the change endpoint.
    pub(crate) changes: ChangeFlag,
    /// Compiled HTML page served at `/`.
    pub(crate) output_file: PathBuf,
}

impl AppState {
    /// Directory holding the output file, served for everything else.
    pub(crate) fn output_dir(&self) -> &Path {
        self.output_file
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
    }
}
