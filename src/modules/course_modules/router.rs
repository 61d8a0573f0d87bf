use axum::{Router, routing::put};

use crate::state::AppState;

use super::controller::{delete_module, update_module, update_module_positions};

/// Routes addressing a module directly. Listing and creation live under
/// `/api/courses/{id}/modules`.
pub fn init_modules_router() -> Router<AppState> {
    Router::new()
        .route("/positions", put(update_module_positions))
        .route("/{id}", put(update_module).delete(delete_module))
}
