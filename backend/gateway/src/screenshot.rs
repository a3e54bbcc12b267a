//! Serves the most recent screenshot reported by the screenshot tool.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use std::path::Path;
use tokio::fs;
use tracing::debug;

use crate::server::GatewayState;

/// Content type by file extension; anything that is not JPEG is served as PNG.
pub fn content_type_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        _ => "image/png",
    }
}

/// Handler for `GET /screenshot`
pub async fn get_screenshot(State(state): State<GatewayState>) -> Response {
    let Some(path) = state.dashboard.last_screenshot_path().await else {
        return (StatusCode::NOT_FOUND, "No screenshot available").into_response();
    };

    let path = Path::new(&path);
    match fs::read(path).await {
        Ok(bytes) => (
            [
                (header::CONTENT_TYPE, content_type_for(path)),
                (header::CACHE_CONTROL, "no-store"),
            ],
            bytes,
        )
            .into_response(),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "Screenshot file unreadable");
            (StatusCode::NOT_FOUND, "Screenshot file not found").into_response()
        }
    }
}
