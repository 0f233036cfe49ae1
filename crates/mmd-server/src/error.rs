//! Error types for the preview server.

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Every port in the fallback range is taken.
    #[error("No free port on {host} between {first} and {last}")]
    NoFreePort { host: String, first: u16, last: u16 },

    /// Grid compilation failed.
    #[error("Compile error: {0}")]
    Compile(#[from] mmd_grid::GridError),

    /// File watcher could not be created.
    #[error("Watch error: {0}")]
    Watch(#[from] notify::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
