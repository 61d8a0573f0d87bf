use axum::{
    Router,
    routing::{get, patch, post, put},
};

use crate::state::AppState;

use super::controller::{
    create_page, delete_page, get_page, get_rendered_page, update_page, update_page_content,
    update_page_positions,
};

/// Routes addressing a page directly. Course-scoped listing and bulk
/// replacement live under `/api/courses/{id}/pages`.
pub fn init_pages_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_page))
        .route("/positions", put(update_page_positions))
        .route(
            "/{id}",
            get(get_page).put(update_page).delete(delete_page),
        )
        .route("/{id}/content", patch(update_page_content))
        .route("/{id}/rendered", get(get_rendered_page))
}
