//! `mmd follow` command implementation.
//!
//! Acts as a preview page in the terminal: downloads the served page, polls
//! the change endpoint, and downloads it again after each change.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Args;
use mmd_poller::{ChangePoller, HttpChangeSource, PageHost, PollerExit};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the follow command.
#[derive(Args)]
pub(crate) struct FollowArgs {
    /// Address of a running `mmd serve`, e.g. <http://localhost:8000>.
    address: String,

    /// Where to save the page.
    #[arg(short, long, default_value = "index.html")]
    output: PathBuf,
}

impl FollowArgs {
    /// Execute the follow command.
    ///
    /// Returns after Ctrl-C.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        follow(&self.address, &self.output, super::ctrl_c()).await
    }
}

/// Terminal stand-in for a browser page.
struct TerminalPage {
    output: Output,
}

impl PageHost for TerminalPage {
    fn reload(&self) {
        tracing::info!("Change detected, downloading page");
    }

    fn alert(&self, message: &str) {
        self.output.error(message);
    }
}

/// Keep `dest` in sync with the page at `address` until `shutdown` resolves.
///
/// Each reload ends a poller, so a fresh one is started per page lifetime.
async fn follow<F>(address: &str, dest: &Path, shutdown: F) -> Result<(), CliError>
where
    F: Future<Output = ()>,
{
    let output = Output::new();
    let url = page_url(address);

    download(&url, dest).await?;
    output.success(&format!("Saved {} to {}", url, dest.display()));

    let source = Arc::new(HttpChangeSource::new(address));
    let page = Arc::new(TerminalPage {
        output: Output::new(),
    });
    output.info(&format!("Following {} (Ctrl-C to stop)", source.url()));

    tokio::pin!(shutdown);
    loop {
        let handle = ChangePoller::new(Arc::clone(&source), Arc::clone(&page)).spawn();

        // Dropping the handle on shutdown cancels the poller
        let exit = tokio::select! {
            exit = handle.wait() => exit,
            () = &mut shutdown => PollerExit::Cancelled,
        };

        match exit {
            PollerExit::Reloaded => match download(&url, dest).await {
                Ok(()) => output.success(&format!("Updated {}", dest.display())),
                Err(e) => output.warning(&e.to_string()),
            },
            PollerExit::Cancelled => break,
        }
    }

    Ok(())
}

/// URL of the page itself.
fn page_url(address: &str) -> String {
    format!("{}/", address.trim_end_matches('/'))
}

/// Fetch the page and write it to `dest`.
async fn download(url: &str, dest: &Path) -> Result<(), CliError> {
    let owned_url = url.to_owned();
    let body = tokio::task::spawn_blocking(move || fetch_page(&owned_url))
        .await
        .map_err(|e| CliError::Runtime(format!("Download task failed: {e}")))??;

    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(dest, body)?;

    tracing::debug!(url, dest = %dest.display(), "Page downloaded");
    Ok(())
}

/// Blocking GET returning the body. Non-2xx statuses are errors.
fn fetch_page(url: &str) -> Result<String, CliError> {
    let to_error = |e: ureq::Error| CliError::Download {
        url: url.to_owned(),
        message: e.to_string(),
    };

    let mut response = ureq::get(url).call().map_err(to_error)?;
    response.body_mut().read_to_string().map_err(to_error)
}
