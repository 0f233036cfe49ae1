//! `mmd build` command implementation.

use clap::Args;
use mmd_grid::compile_file;

use super::SourceArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    #[command(flatten)]
    source: SourceArgs,
}

impl BuildArgs {
    /// Execute the build command.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.source.load_config(None, None)?;

        compile_file(self.source.file(), &config.output_file, None)?;

        output.success(&format!(
            "Compiled {} to {}",
            self.source.file().display(),
            config.output_file.display()
        ));
        Ok(())
    }
}
