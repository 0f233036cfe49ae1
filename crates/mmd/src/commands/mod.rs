//! CLI command implementations.

pub(crate) mod build;
pub(crate) mod follow;
pub(crate) mod serve;
pub(crate) mod watch;

use std::path::PathBuf;

use clap::Args;
use mmd_config::{CliSettings, Config};

pub(crate) use build::BuildArgs;
pub(crate) use follow::FollowArgs;
pub(crate) use serve::ServeArgs;
pub(crate) use watch::WatchArgs;

use crate::error::CliError;

/// Source file arguments shared by the compiling commands.
#[derive(Args)]
pub(crate) struct SourceArgs {
    /// Grid markdown file to compile.
    file: PathBuf,

    /// Output HTML file (overrides config, default: index.html).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover mmd.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl SourceArgs {
    pub(crate) fn file(&self) -> &PathBuf {
        &self.file
    }

    /// Check the source exists and load config with CLI overrides applied.
    pub(crate) fn load_config(
        &self,
        host: Option<String>,
        port: Option<u16>,
    ) -> Result<Config, CliError> {
        if !self.file.is_file() {
            return Err(CliError::FileNotFound(self.file.clone()));
        }

        let settings = CliSettings {
            host,
            port,
            output_file: self.output.clone(),
        };
        Ok(Config::load(self.config.as_deref(), Some(&settings))?)
    }
}

/// Resolve on Ctrl-C.
///
/// If the handler cannot be installed this never resolves.
pub(crate) async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
