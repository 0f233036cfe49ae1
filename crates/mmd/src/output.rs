//! Colored terminal output.
//!
//! Everything goes to stderr so `mmd` never interleaves with piped stdout.

use console::{Style, Term};

/// Terminal output formatter.
pub(crate) struct Output {
    term: Term,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
        }
    }

    pub(crate) fn info(&self, msg: &str) {
        self.line(&Style::new(), msg);
    }

    /// Green.
    pub(crate) fn success(&self, msg: &str) {
        self.line(&Style::new().green(), msg);
    }

    /// Yellow.
    pub(crate) fn warning(&self, msg: &str) {
        self.line(&Style::new().yellow(), msg);
    }

    /// Red. Also used for poller alerts.
    pub(crate) fn error(&self, msg: &str) {
        self.line(&Style::new().red(), msg);
    }

    /// Cyan bold, for the URL a user should open.
    pub(crate) fn highlight(&self, msg: &str) {
        self.line(&Style::new().cyan().bold(), msg);
    }

    fn line(&self, style: &Style, msg: &str) {
        // Nothing sensible to do if stderr is gone
        let _ = self.term.write_line(&style.apply_to(msg).to_string());
    }
}
