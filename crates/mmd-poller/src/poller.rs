//! The polling loop.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};

use crate::error::PollError;
use crate::host::PageHost;
use crate::source::ChangeSource;

/// Fixed delay between poll ticks.
pub const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Result of a single poll tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// The server reported no change.
    Unchanged,
    /// The server reported a change and the page was reloaded.
    Reloaded,
    /// The request failed and the user was alerted.
    Failed(PollError),
}

/// Why a polling loop ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PollerExit {
    /// A change was detected and the page reloaded.
    Reloaded,
    /// The owner stopped the poller.
    Cancelled,
}

/// Polls a [`ChangeSource`] on a fixed cadence and drives a [`PageHost`].
///
/// Ticks fire every [`POLL_INTERVAL`] regardless of earlier outcomes. A
/// request that outlives the interval does not hold back the next tick, so
/// several requests may be in flight at once; results are applied in the
/// order they complete. The first tick fires one interval after start.
pub struct ChangePoller<S, H> {
    source: Arc<S>,
    host: Arc<H>,
    interval: Duration,
}

impl<S: ChangeSource, H: PageHost> ChangePoller<S, H> {
    #[must_use]
    pub fn new(source: Arc<S>, host: Arc<H>) -> Self {
        Self {
            source,
            host,
            interval: POLL_INTERVAL,
        }
    }

    /// Override the tick interval.
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run a single tick: one check, then reload or alert as needed.
    pub async fn poll_once(&self) -> TickOutcome {
        let result = self.source.check().await;
        self.apply(result)
    }

    /// Act on the result of one check.
    fn apply(&self, result: Result<bool, PollError>) -> TickOutcome {
        match result {
            Ok(true) => {
                tracing::info!("Change detected, reloading page");
                self.host.reload();
                TickOutcome::Reloaded
            }
            Ok(false) => {
                tracing::trace!("No change");
                TickOutcome::Unchanged
            }
            Err(err) => {
                tracing::warn!(error = %err, status = ?err.status(), "Change poll failed");
                self.host.alert(&format!("Something went wrong: {err}"));
                TickOutcome::Failed(err)
            }
        }
    }

    /// Poll until a change reloads the page or `cancel` resolves.
    ///
    /// Requests still in flight when the loop ends are aborted.
    pub async fn run(self, cancel: impl Future<Output = ()>) -> PollerExit {
        let mut ticker = ticker(self.interval);
        let mut in_flight = JoinSet::new();
        tokio::pin!(cancel);

        loop {
            tokio::select! {
                () = &mut cancel => {
                    tracing::debug!(pending = in_flight.len(), "Poller cancelled");
                    return PollerExit::Cancelled;
                }
                _ = ticker.tick() => {
                    let source = Arc::clone(&self.source);
                    in_flight.spawn(async move { source.check().await });
                    if in_flight.len() > 1 {
                        tracing::debug!(pending = in_flight.len(), "Earlier change poll still pending");
                    }
                }
                Some(joined) = in_flight.join_next() => match joined {
                    Ok(result) => {
                        if matches!(self.apply(result), TickOutcome::Reloaded) {
                            return PollerExit::Reloaded;
                        }
                    }
                    Err(e) => tracing::error!(error = %e, "Change poll task failed"),
                },
            }
        }
    }

    /// Start polling on the current tokio runtime.
    ///
    /// The returned handle owns the loop: dropping it cancels polling.
    #[must_use]
    pub fn spawn(self) -> PollerHandle {
        let (cancel_tx, cancel_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(self.run(async move {
            // Fires on an explicit stop and when the sender is dropped.
            let _ = cancel_rx.await;
        }));

        PollerHandle {
            cancel: Some(cancel_tx),
            task,
        }
    }
}

/// Tick source: first tick one `period` from now, then every `period`.
///
/// A tick that comes late pushes the following ones back instead of letting
/// them fire back to back.
fn ticker(period: Duration) -> Interval {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

/// Owner handle for a spawned [`ChangePoller`].
pub struct PollerHandle {
    cancel: Option<oneshot::Sender<()>>,
    task: JoinHandle<PollerExit>,
}

impl PollerHandle {
    /// Stop polling and wait for the loop to end.
    pub async fn stop(mut self) -> PollerExit {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
        Self::join(self.task).await
    }

    /// Wait until the loop ends on its own, i.e. after a reload.
    pub async fn wait(self) -> PollerExit {
        let Self { cancel, task } = self;
        let exit = Self::join(task).await;
        drop(cancel);
        exit
    }

    /// Whether the loop has already ended.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    async fn join(task: JoinHandle<PollerExit>) -> PollerExit {
        match task.await {
            Ok(exit) => exit,
            Err(e) => {
                tracing::error!(error = %e, "Poller task ended abnormally");
                PollerExit::Cancelled
            }
        }
    }
}
