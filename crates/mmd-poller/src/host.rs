//! The page side of polling: what happens on a change or a failure.

/// Actions the poller can take on the page it serves.
pub trait PageHost: Send + Sync + 'static {
    /// Reload the page. Terminal: the poller stops after calling this.
    fn reload(&self);

    /// Show a failure to the user.
    fn alert(&self, message: &str);
}
