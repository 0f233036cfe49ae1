//! `mmd watch` command implementation.

use clap::Args;
use mmd_server::{ChangeFlag, FileWatcher};

use super::SourceArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the watch command.
#[derive(Args)]
pub(crate) struct WatchArgs {
    #[command(flatten)]
    source: SourceArgs,
}

impl WatchArgs {
    /// Execute the watch command.
    ///
    /// Compiles once, then recompiles on every save until Ctrl-C.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.source.load_config(None, None)?;

        // Nobody polls without a server, the flag only satisfies the watcher
        let mut watcher = FileWatcher::new(
            self.source.file().clone(),
            config.output_file.clone(),
            ChangeFlag::new(),
        )
        .with_debounce_ms(config.watch.debounce_ms);
        watcher.start()?;

        output.success(&format!(
            "Compiled {} to {}",
            self.source.file().display(),
            config.output_file.display()
        ));
        output.info("Watching for changes (Ctrl-C to stop)");

        super::ctrl_c().await;
        drop(watcher);

        Ok(())
    }
}
