use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use tracing::instrument;

use coursekit_content::RenderedDocument;
use coursekit_core::AppError;

use crate::modules::resources::service::ResourceService;
use crate::modules::resources::view::resource_page;
use crate::state::AppState;

/// `/res` has no index page.
pub async fn resources_index() -> Redirect {
    Redirect::to("/")
}

/// Renders a resource as a standalone HTML page. Unknown or missing
/// documents send the visitor back to the home page.
#[instrument(skip(state))]
pub async fn show_resource(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Response, AppError> {
    match ResourceService::load(state.content.clone(), slug).await {
        Ok(document) => {
            let markup = resource_page(&document, &state.content_config.site_name);
            Ok(Html(markup.into_string()).into_response())
        }
        Err(err) if err.status == StatusCode::NOT_FOUND => {
            tracing::debug!(error = %err.error, "Resource missing, redirecting home");
            Ok(Redirect::to("/").into_response())
        }
        Err(err) => Err(err),
    }
}

#[utoipa::path(
    get,
    path = "/api/resources/{slug}",
    params(
        ("slug" = String, Path, description = "Resource slug: faq, tos, contact or privacy")
    ),
    responses(
        (status = 200, description = "Rendered resource document", body = RenderedDocument),
        (status = 404, description = "Unknown or missing resource")
    ),
    tag = "Resources"
)]
#[instrument(skip(state))]
pub async fn get_resource(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<RenderedDocument>, AppError> {
    let document = ResourceService::load(state.content.clone(), slug).await?;
    Ok(Json(document))
}
