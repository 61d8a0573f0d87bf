use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    /// Storage key, `{digest}/{file name}`
    pub key: String,
    pub url: String,
    /// Sanitized original file name
    pub name: String,
    pub size: usize,
}

/// Multipart body accepted by `POST /api/uploads`.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct UploadForm {
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}
