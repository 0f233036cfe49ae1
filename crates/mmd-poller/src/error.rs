//! Error types for change polling.

/// A failed poll tick.
///
/// Every outcome other than HTTP 200 is a failure; the variants only keep
/// enough detail for the alert text.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PollError {
    /// The server answered with a status other than 200.
    #[error("server responded with status {0}")]
    Status(u16),

    /// No HTTP response was received (connection refused, timeout, etc).
    #[error("request failed: {0}")]
    Transport(String),
}

impl PollError {
    /// HTTP status code, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status(status) => Some(*status),
            Self::Transport(_) => None,
        }
    }
}
