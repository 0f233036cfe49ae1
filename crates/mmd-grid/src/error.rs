//! Error types for grid compilation.

use std::path::PathBuf;

/// Error from compiling a grid file.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// The source file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The HTML output could not be written.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
