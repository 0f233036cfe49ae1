//! CLI error types.

use std::path::PathBuf;

use mmd_config::ConfigError;
use mmd_grid::GridError;
use mmd_server::ServerError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("file {} not found", .0.display())]
    FileNotFound(PathBuf),

    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Grid(#[from] GridError),

    #[error("{0}")]
    Server(#[from] ServerError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("failed to download {url}: {message}")]
    Download { url: String, message: String },

    #[error("{0}")]
    Runtime(String),
}
