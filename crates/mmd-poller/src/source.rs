//! Where poll results come from.

use std::future::Future;
use std::time::Duration;

use serde::Deserialize;
use ureq::Agent;

use crate::CHANGE_PATH;
use crate::error::PollError;

/// HTTP timeout in seconds. Bounds how long a blocking thread can be held
/// by a request the server never answers.
const DEFAULT_TIMEOUT: u64 = 30;

/// A source of change flags, queried once per poll tick.
pub trait ChangeSource: Send + Sync + 'static {
    /// Ask whether the document changed since the last check.
    fn check(&self) -> impl Future<Output = Result<bool, PollError>> + Send;
}

/// Body of a `/is_changed/` response. Unknown fields are ignored and a
/// missing flag reads as "not changed".
#[derive(Debug, Default, Deserialize)]
struct ChangeResponse {
    #[serde(default)]
    is_changed: bool,
}

/// Turn a raw HTTP response into a poll result.
///
/// Status 200 is success whatever the body looks like; a body that is not a
/// JSON object (or not even UTF-8) reads as "not changed".
pub(crate) fn interpret(status: u16, body: &[u8]) -> Result<bool, PollError> {
    if status != 200 {
        return Err(PollError::Status(status));
    }

    match serde_json::from_slice::<ChangeResponse>(body) {
        Ok(response) => Ok(response.is_changed),
        Err(e) => {
            tracing::debug!(error = %e, "Ignoring malformed change response body");
            Ok(false)
        }
    }
}

/// Build the change endpoint URL from a server base address.
pub(crate) fn change_url(server_address: &str) -> String {
    format!("{}{CHANGE_PATH}", server_address.trim_end_matches('/'))
}

/// [`ChangeSource`] backed by `GET {server_address}/is_changed/`.
#[derive(Clone)]
pub struct HttpChangeSource {
    agent: Agent,
    url: String,
}

impl HttpChangeSource {
    /// Create a source polling the given server base address.
    #[must_use]
    pub fn new(server_address: &str) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(DEFAULT_TIMEOUT)))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            url: change_url(server_address),
        }
    }

    /// Full URL of the change endpoint.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Perform one blocking request.
    fn fetch(&self) -> Result<bool, PollError> {
        let response = self
            .agent
            .get(&self.url)
            .header("Accept", "application/json")
            .call()
            .map_err(|e| PollError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        // The status alone decides failure, the body is never read for it
        if status != 200 {
            return Err(PollError::Status(status));
        }

        match response.into_body().read_to_vec() {
            Ok(body) => interpret(status, &body),
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring unreadable change response body");
                Ok(false)
            }
        }
    }
}

impl ChangeSource for HttpChangeSource {
    async fn check(&self) -> Result<bool, PollError> {
        let source = self.clone();
        tokio::task::spawn_blocking(move || source.fetch())
            .await
            .map_err(|e| PollError::Transport(e.to_string()))?
    }
}
