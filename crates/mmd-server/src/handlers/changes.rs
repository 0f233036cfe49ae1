//! Change endpoint polled by preview pages.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use serde::Serialize;

use crate::state::AppState;

/// Response body of the change endpoint.
#[derive(Serialize)]
pub(crate) struct ChangeResponse {
    pub is_changed: bool,
}

/// Handle GET /is_changed/.
///
/// Reports whether the page was recompiled since the last poll and clears
/// the flag.
pub(crate) async fn get_is_changed(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let is_changed = state.changes.take();
    if is_changed {
        tracing::debug!("Reporting change to poller");
    }

    (
        [(header::CACHE_CONTROL, "no-store")],
        Json(ChangeResponse { is_changed }),
    )
}
