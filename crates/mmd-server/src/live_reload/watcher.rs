//! Source file watcher.
//!
//! Compiles the grid once on start, then recompiles whenever the source file
//! is saved and raises the [`ChangeFlag`] so preview pages reload.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use mmd_grid::compile_file;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use super::debouncer::{SaveDebouncer, SaveKind};
use super::flag::ChangeFlag;
use crate::error::ServerError;

/// Default debounce duration in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 100;

/// How often the debouncer is checked for settled events.
const DRAIN_INTERVAL: Duration = Duration::from_millis(50);

/// What to compile, where, and for which server.
#[derive(Clone, Debug)]
struct CompileJob {
    source: PathBuf,
    output: PathBuf,
    live_server_address: Option<String>,
}

impl CompileJob {
    fn run(&self) -> Result<(), mmd_grid::GridError> {
        compile_file(
            &self.source,
            &self.output,
            self.live_server_address.as_deref(),
        )
    }
}

/// Watches one grid source file and recompiles it on change.
pub struct FileWatcher {
    job: CompileJob,
    changes: ChangeFlag,
    debounce_ms: u64,
    watcher: Option<RecommendedWatcher>,
}

impl FileWatcher {
    /// Create a watcher for `source`, writing HTML to `output`.
    ///
    /// `changes` is marked after every successful recompile.
    #[must_use]
    pub fn new(source: PathBuf, output: PathBuf, changes: ChangeFlag) -> Self {
        Self {
            job: CompileJob {
                source,
                output,
                live_server_address: None,
            },
            changes,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            watcher: None,
        }
    }

    /// Inject the live reload script pointing at this server address.
    #[must_use]
    pub fn with_live_server(mut self, address: impl Into<String>) -> Self {
        self.job.live_server_address = Some(address.into());
        self
    }

    /// Set the debounce duration in milliseconds.
    #[must_use]
    pub fn with_debounce_ms(mut self, debounce_ms: u64) -> Self {
        self.debounce_ms = debounce_ms;
        self
    }

    pub fn source(&self) -> &Path {
        &self.job.source
    }

    pub fn output(&self) -> &Path {
        &self.job.output
    }

    /// Compile once, then start watching.
    ///
    /// Spawns a background task on the current tokio runtime. The task ends
    /// when this watcher is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the first compile fails or the file watcher
    /// cannot be created.
    pub fn start(&mut self) -> Result<(), ServerError> {
        self.job.run()?;

        let source = std::fs::canonicalize(&self.job.source)?;
        let watch_dir = source
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        let Some(file_name) = source.file_name().map(ToOwned::to_owned) else {
            return Err(ServerError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("not a file: {}", source.display()),
            )));
        };

        let (tx, rx) = mpsc::channel::<Event>(100);

        // Editors often replace the file on save, so watch its directory.
        let mut watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
            match res {
                // Callback runs on the notify thread, outside the runtime
                Ok(event) => {
                    let _ = tx.blocking_send(event);
                }
                Err(e) => tracing::warn!(error = %e, "File watcher error"),
            }
        })?;
        watcher.watch(&watch_dir, RecursiveMode::NonRecursive)?;
        self.watcher = Some(watcher);

        tracing::info!(
            source = %source.display(),
            debounce_ms = self.debounce_ms,
            "Watching source file"
        );

        let debouncer = SaveDebouncer::new(Duration::from_millis(self.debounce_ms));
        tokio::spawn(watch_loop(
            rx,
            file_name,
            debouncer,
            self.job.clone(),
            self.changes.clone(),
        ));

        Ok(())
    }
}

/// Record raw events and act on the debounced ones until the watcher closes.
async fn watch_loop(
    mut rx: mpsc::Receiver<Event>,
    file_name: OsString,
    mut debouncer: SaveDebouncer,
    job: CompileJob,
    changes: ChangeFlag,
) {
    let mut ticker = tokio::time::interval(DRAIN_INTERVAL);

    loop {
        tokio::select! {
            received = rx.recv() => {
                let Some(event) = received else {
                    tracing::debug!("File watcher closed");
                    break;
                };
                if let Some(kind) = save_kind(&event, &file_name) {
                    tracing::debug!(?kind, "Recorded filesystem event");
                    debouncer.record(kind, Instant::now());
                }
            }
            _ = ticker.tick() => {
                if let Some(kind) = debouncer.take_ready(Instant::now()) {
                    handle_save(kind, &job, &changes);
                }
            }
        }
    }
}

/// Classify a raw filesystem event, or `None` if it is not about the file.
fn save_kind(event: &Event, file_name: &OsStr) -> Option<SaveKind> {
    let kind = match event.kind {
        EventKind::Create(_) | EventKind::Modify(_) => SaveKind::Changed,
        EventKind::Remove(_) => SaveKind::Removed,
        _ => return None,
    };

    event
        .paths
        .iter()
        .any(|path| path.file_name() == Some(file_name))
        .then_some(kind)
}

/// Recompile after a settled save and raise the change flag.
fn handle_save(kind: SaveKind, job: &CompileJob, changes: &ChangeFlag) {
    match kind {
        SaveKind::Changed => match job.run() {
            Ok(()) => {
                changes.mark();
                tracing::info!(path = %job.source.display(), "Recompiled after change");
            }
            Err(e) => {
                tracing::warn!(error = %e, "Recompile failed, keeping previous output");
            }
        },
        SaveKind::Removed => {
            tracing::warn!(path = %job.source.display(), "Source file removed");
        }
    }
}
