//! `mmd serve` command implementation.

use clap::Args;
use mmd_server::{Server, ServerConfig};

use super::SourceArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Host to bind to (overrides config).
    #[arg(long, env = "MMD_HOST")]
    host: Option<String>,

    /// First port to try (overrides config).
    #[arg(short, long, env = "MMD_PORT")]
    port: Option<u16>,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// Returns after Ctrl-C.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.source.load_config(self.host, self.port)?;

        let server = Server::bind(ServerConfig {
            host: config.server.host.clone(),
            port: config.server.port,
            source_file: self.source.file().clone(),
            output_file: config.output_file.clone(),
            debounce_ms: config.watch.debounce_ms,
        })
        .await?;

        output.info(&format!(
            "Compiled {} to {}",
            self.source.file().display(),
            config.output_file.display()
        ));
        output.highlight(&format!("Serving live preview at {}", server.url()));

        server.run().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use pretty_assertions::assert_eq;

    use super::*;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        serve: ServeArgs,
    }

    // The only test touching MMD_HOST / MMD_PORT, so nothing races on them.
    #[test]
    fn test_host_and_port_from_environment() {
        // SAFETY: no other test reads or writes these variables
        unsafe {
            std::env::set_var("MMD_HOST", "0.0.0.0");
            std::env::set_var("MMD_PORT", "9100");
        }

        let from_env = Harness::try_parse_from(["mmd", "song.mmd"]);
        let with_flag = Harness::try_parse_from(["mmd", "song.mmd", "--port", "9200"]);

        // SAFETY: as above
        unsafe {
            std::env::remove_var("MMD_HOST");
            std::env::remove_var("MMD_PORT");
        }

        let from_env = from_env.unwrap().serve;
        assert_eq!(from_env.host.as_deref(), Some("0.0.0.0"));
        assert_eq!(from_env.port, Some(9100));

        let with_flag = with_flag.unwrap().serve;
        assert_eq!(with_flag.host.as_deref(), Some("0.0.0.0"));
        assert_eq!(with_flag.port, Some(9200));
    }
}
