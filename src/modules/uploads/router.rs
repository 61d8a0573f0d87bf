use axum::{Router, extract::DefaultBodyLimit, routing::post};

use crate::state::AppState;

use super::controller::upload_file;

/// Headroom over the file limit for multipart framing.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn init_uploads_router(max_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/", post(upload_file))
        .layer(DefaultBodyLimit::max(max_bytes + MULTIPART_OVERHEAD))
}
