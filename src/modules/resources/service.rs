use std::sync::Arc;

use tracing::instrument;

use coursekit_content::{ContentError, ContentLoader, RenderedDocument, ResourceCategory};
use coursekit_core::AppError;

use crate::metrics::track_document_rendered;

pub struct ResourceService;

fn content_error(err: ContentError) -> AppError {
    if err.is_not_found() {
        AppError::not_found(anyhow::anyhow!("Resource not found: {}", err))
    } else {
        AppError::internal(err)
    }
}

impl ResourceService {
    /// Loads and renders a known resource off the async runtime. Unknown
    /// slugs are reported as not found without touching the disk.
    #[instrument(skip(loader))]
    pub async fn load(loader: Arc<ContentLoader>, slug: String) -> Result<RenderedDocument, AppError> {
        let category = ResourceCategory::Res;
        if !category.is_known(&slug) {
            return Err(AppError::not_found(anyhow::anyhow!(
                "Resource not found: {}",
                slug
            )));
        }

        let document = tokio::task::spawn_blocking(move || loader.load(category, &slug))
            .await
            .map_err(AppError::internal)?
            .map_err(content_error)?;

        track_document_rendered("resource");
        Ok(document)
    }
}
