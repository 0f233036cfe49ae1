//! Live reload: recompile on save and report it through the change flag.

mod debouncer;
mod flag;
mod watcher;

pub use flag::ChangeFlag;
pub use watcher::{DEFAULT_DEBOUNCE_MS, FileWatcher};
