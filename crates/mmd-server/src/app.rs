//! Router construction.
//!
//! Builds the axum router with all routes and middleware.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use mmd_poller::CHANGE_PATH;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::headers;
use crate::state::AppState;

/// Create the application router.
///
/// `/` serves the compiled page, the change endpoint reports recompiles, and
/// any other path is looked up next to the page.
pub(crate) fn create_router(state: Arc<AppState>) -> Router {
    let page = ServeFile::new(&state.output_file);
    let files = ServeDir::new(state.output_dir());

    Router::new()
        .route(CHANGE_PATH, get(handlers::changes::get_is_changed))
        .route_service("/", page)
        .fallback_service(files)
        .layer(headers::content_type_options_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use pretty_assertions::assert_eq;
    use tower::ServiceExt;

    use super::*;
    use crate::live_reload::ChangeFlag;

    fn state_for(dir: &Path) -> Arc<AppState> {
        Arc::new(AppState {
            changes: ChangeFlag::new(),
            output_file: dir.join("index.html"),
        })
    }

    async fn get_body(router: Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, String) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, headers, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_is_changed_reports_and_clears_flag() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_for(dir.path());
        state.changes.mark();

        let (status, headers, body) =
            get_body(create_router(Arc::clone(&state)), "/is_changed/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CACHE_CONTROL], "no-store");
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json, serde_json::json!({ "is_changed": true }));

        let (_, _, body) = get_body(create_router(Arc::clone(&state)), "/is_changed/").await;
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json, serde_json::json!({ "is_changed": false }));
    }

    #[tokio::test]
    async fn test_root_serves_output_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>Blues</h1>").unwrap();

        let (status, headers, body) = get_body(create_router(state_for(dir.path())), "/").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "<h1>Blues</h1>");
        assert!(
            headers[header::CONTENT_TYPE]
                .to_str()
                .unwrap()
                .starts_with("text/html")
        );
    }

    #[tokio::test]
    async fn test_other_files_served_from_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "").unwrap();
        std::fs::write(dir.path().join("extra.css"), "body {}").unwrap();

        let (status, _, body) = get_body(create_router(state_for(dir.path())), "/extra.css").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "body {}");
    }

    #[tokio::test]
    async fn test_unknown_path_is_404() {
        let dir = tempfile::tempdir().unwrap();

        let (status, _, _) = get_body(create_router(state_for(dir.path())), "/nope.txt").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_nosniff_header_on_every_response() {
        let dir = tempfile::tempdir().unwrap();

        let (_, headers, _) = get_body(create_router(state_for(dir.path())), "/is_changed/").await;
        assert_eq!(headers["x-content-type-options"], "nosniff");

        let (_, headers, _) = get_body(create_router(state_for(dir.path())), "/missing").await;
        assert_eq!(headers["x-content-type-options"], "nosniff");
    }
}
