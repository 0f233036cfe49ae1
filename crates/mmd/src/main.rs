//! mmd CLI - Music grid markdown.
//!
//! Provides commands for:
//! - `build`: Compile a grid to HTML once
//! - `watch`: Recompile on every save
//! - `serve`: Live preview server
//! - `follow`: Keep a local copy of a served page up to date

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BuildArgs, FollowArgs, ServeArgs, WatchArgs};
use error::CliError;
use output::Output;

/// mmd - Music grid markdown.
#[derive(Parser)]
#[command(name = "mmd", version, about)]
struct Cli {
    /// Enable verbose output (INFO level logs).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a grid file to HTML.
    Build(BuildArgs),
    /// Recompile a grid file whenever it changes.
    Watch(WatchArgs),
    /// Serve a live preview that reloads on save.
    Serve(ServeArgs),
    /// Follow a running preview server and download the page on change.
    Follow(FollowArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let result = match cli.command {
        Commands::Build(args) => args.execute(),
        Commands::Watch(args) => block_on(args.execute()),
        Commands::Serve(args) => block_on(args.execute()),
        Commands::Follow(args) => block_on(args.execute()),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

/// Run an async command on a fresh multi-threaded runtime.
fn block_on<F>(command: F) -> Result<(), CliError>
where
    F: Future<Output = Result<(), CliError>>,
{
    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::Runtime(format!("Failed to create tokio runtime: {e}")))?;
    rt.block_on(command)
}
