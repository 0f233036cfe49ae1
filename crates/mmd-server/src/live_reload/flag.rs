//! Shared "document changed" flag.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Set by the watcher after each recompile, consumed by the change endpoint.
///
/// Reading through [`ChangeFlag::take`] clears the flag, so a change is
/// reported to exactly one poll request.
#[derive(Clone, Debug, Default)]
pub struct ChangeFlag(Arc<AtomicBool>);

impl ChangeFlag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that the output was rebuilt.
    pub fn mark(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Return the flag and clear it.
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::AcqRel)
    }

    /// Read the flag without clearing it.
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_flag_is_clear() {
        let flag = ChangeFlag::new();
        assert!(!flag.is_set());
        assert!(!flag.take());
    }

    #[test]
    fn test_take_clears_flag() {
        let flag = ChangeFlag::new();
        flag.mark();

        assert!(flag.is_set());
        assert!(flag.take());
        assert!(!flag.take());
        assert!(!flag.is_set());
    }

    #[test]
    fn test_repeated_marks_report_once() {
        let flag = ChangeFlag::new();
        flag.mark();
        flag.mark();

        assert!(flag.take());
        assert!(!flag.take());
    }

    #[test]
    fn test_clones_share_state() {
        let flag = ChangeFlag::new();
        let watcher_side = flag.clone();

        watcher_side.mark();

        assert!(flag.take());
        assert!(!watcher_side.is_set());
    }
}
