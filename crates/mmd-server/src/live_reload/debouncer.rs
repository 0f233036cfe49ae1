//! Save debouncing for the watched source file.
//!
//! One save shows up as a burst of events: truncate and write, or remove
//! and rename over. The burst is folded into a single [`SaveKind`] that is
//! released once the file has been quiet for the debounce duration.

use std::time::{Duration, Instant};

/// What a settled burst of events amounts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SaveKind {
    /// The file exists with new contents.
    Changed,
    /// The file is gone.
    Removed,
}

/// Folds events for one file and releases them after a quiet period.
///
/// Owned by the watch loop, so it needs no locking.
#[derive(Debug)]
pub(crate) struct SaveDebouncer {
    quiet: Duration,
    pending: Option<(SaveKind, Instant)>,
}

impl SaveDebouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
        }
    }

    /// Record an event seen at `now`.
    ///
    /// The newest event decides the outcome: a remove followed by a create is
    /// an atomic save, a write followed by a remove is a deletion.
    pub fn record(&mut self, kind: SaveKind, now: Instant) {
        self.pending = Some((kind, now + self.quiet));
    }

    /// Take the pending event if its quiet period has passed by `now`.
    pub fn take_ready(&mut self, now: Instant) -> Option<SaveKind> {
        match self.pending {
            Some((kind, deadline)) if deadline <= now => {
                self.pending = None;
                Some(kind)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUIET: Duration = Duration::from_millis(100);

    #[test]
    fn test_nothing_pending_initially() {
        let mut debouncer = SaveDebouncer::new(QUIET);
        assert_eq!(debouncer.take_ready(Instant::now()), None);
    }

    #[test]
    fn test_save_released_after_quiet_period() {
        let mut debouncer = SaveDebouncer::new(QUIET);
        let t0 = Instant::now();

        debouncer.record(SaveKind::Changed, t0);

        assert_eq!(debouncer.take_ready(t0 + Duration::from_millis(99)), None);
        assert_eq!(debouncer.take_ready(t0 + QUIET), Some(SaveKind::Changed));
        assert_eq!(debouncer.take_ready(t0 + QUIET * 2), None);
    }

    #[test]
    fn test_burst_pushes_release_back() {
        let mut debouncer = SaveDebouncer::new(QUIET);
        let t0 = Instant::now();

        debouncer.record(SaveKind::Changed, t0);
        debouncer.record(SaveKind::Changed, t0 + Duration::from_millis(60));

        // 120ms after the first event, only 60ms after the second
        assert_eq!(debouncer.take_ready(t0 + Duration::from_millis(120)), None);
        assert_eq!(
            debouncer.take_ready(t0 + Duration::from_millis(160)),
            Some(SaveKind::Changed)
        );
    }

    #[test]
    fn test_rename_over_save_is_a_change() {
        let mut debouncer = SaveDebouncer::new(QUIET);
        let t0 = Instant::now();

        debouncer.record(SaveKind::Removed, t0);
        debouncer.record(SaveKind::Changed, t0 + Duration::from_millis(1));

        assert_eq!(debouncer.take_ready(t0 + QUIET * 2), Some(SaveKind::Changed));
    }

    #[test]
    fn test_write_then_delete_is_a_removal() {
        let mut debouncer = SaveDebouncer::new(QUIET);
        let t0 = Instant::now();

        debouncer.record(SaveKind::Changed, t0);
        debouncer.record(SaveKind::Removed, t0 + Duration::from_millis(1));

        assert_eq!(debouncer.take_ready(t0 + QUIET * 2), Some(SaveKind::Removed));
    }

    #[test]
    fn test_zero_quiet_period_releases_immediately() {
        let mut debouncer = SaveDebouncer::new(Duration::ZERO);
        let t0 = Instant::now();

        debouncer.record(SaveKind::Changed, t0);

        assert_eq!(debouncer.take_ready(t0), Some(SaveKind::Changed));
    }
}
