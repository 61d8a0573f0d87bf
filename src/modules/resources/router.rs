use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{get_resource, resources_index, show_resource};

/// HTML pages under `/res`, merged at the root so both `/res` and `/res/`
/// resolve.
pub fn init_resource_pages_router() -> Router<AppState> {
    Router::new()
        .route("/res", get(resources_index))
        .route("/res/", get(resources_index))
        .route("/res/{slug}", get(show_resource))
}

/// JSON documents, mounted at `/api/resources`.
pub fn init_resources_router() -> Router<AppState> {
    Router::new().route("/{slug}", get(get_resource))
}
