use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
};
use tracing::instrument;

use coursekit_core::AppError;

use crate::middleware::auth::RequireUploadsCreate;
use crate::modules::uploads::model::{UploadForm, UploadResponse};
use crate::modules::uploads::service::UploadService;
use crate::state::AppState;

const FILE_FIELD: &str = "file";

#[utoipa::path(
    post,
    path = "/api/uploads",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "File stored", body = UploadResponse),
        (status = 400, description = "Missing file, disallowed type or file too large"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires uploads:create permission")
    ),
    tag = "Uploads",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, multipart))]
pub async fn upload_file(
    State(state): State<AppState>,
    RequireUploadsCreate(auth_user): RequireUploadsCreate,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(anyhow::anyhow!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let mime_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::bad_request(anyhow::anyhow!("Failed to read file: {}", e)))?;

        tracing::debug!(user = %auth_user.email(), file.name = %file_name, "Receiving upload");

        let response =
            UploadService::store(state.storage.as_ref(), &file_name, &mime_type, &bytes).await?;
        return Ok((StatusCode::CREATED, Json(response)));
    }

    Err(AppError::bad_request(anyhow::anyhow!(
        "Missing '{}' field",
        FILE_FIELD
    )))
}
