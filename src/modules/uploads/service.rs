use sha2::{Digest, Sha256};
use tracing::instrument;

use coursekit_core::AppError;
use coursekit_core::file_storage::{FileStorage, StorageError};

use crate::metrics::track_upload_stored;
use crate::modules::uploads::model::UploadResponse;

/// Hex characters of the SHA-256 digest used as the key prefix.
const DIGEST_PREFIX_LEN: usize = 16;

pub struct UploadService;

fn storage_error(err: StorageError) -> AppError {
    if err.is_client_error() {
        AppError::bad_request(err)
    } else {
        AppError::internal(err)
    }
}

/// Reduces a client file name to `[A-Za-z0-9._-]`, with no leading dots and
/// no `..` runs. Empty results become `file`.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();

    let mut sanitized = String::with_capacity(base.len());
    for c in base.chars() {
        let c = if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
            c
        } else {
            '_'
        };
        if c == '.' && sanitized.ends_with('.') {
            continue;
        }
        sanitized.push(c);
    }

    let trimmed = sanitized.trim_start_matches('.');
    if trimmed.is_empty() {
        "file".to_string()
    } else {
        trimmed.chars().take(128).collect()
    }
}

/// Content-addressed key: identical bytes under the same name share a key.
pub fn storage_key(content: &[u8], file_name: &str) -> String {
    let digest = hex::encode(Sha256::digest(content));
    format!("{}/{}", &digest[..DIGEST_PREFIX_LEN], file_name)
}

impl UploadService {
    #[instrument(skip(storage, content), fields(file.size = content.len()))]
    pub async fn store(
        storage: &dyn FileStorage,
        file_name: &str,
        mime_type: &str,
        content: &[u8],
    ) -> Result<UploadResponse, AppError> {
        storage
            .check_upload(mime_type, content.len())
            .map_err(storage_error)?;

        let name = sanitize_file_name(file_name);
        let key = storage_key(content, &name);

        let key = storage.save(&key, content).await.map_err(|e| {
            tracing::error!(error = %e, key = %key, "Failed to store upload");
            storage_error(e)
        })?;
        let url = storage.get_url(&key).map_err(storage_error)?;

        track_upload_stored(mime_type, content.len());
        tracing::info!(key = %key, "Upload stored");

        Ok(UploadResponse {
            key,
            url,
            name,
            size: content.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursekit_core::file_storage::LocalFileStorage;

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("thumbnail.png"), "thumbnail.png");
        assert_eq!(sanitize_file_name("my photo (1).JPG"), "my_photo__1_.JPG");
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\Users\\me\\notes.pdf"), "notes.pdf");
        assert_eq!(sanitize_file_name("..hidden..png"), "hidden.png");
        assert_eq!(sanitize_file_name(""), "file");
        assert_eq!(sanitize_file_name("..."), "file");
    }

    #[test]
    fn test_storage_key_is_content_addressed() {
        let a = storage_key(b"same bytes", "a.png");
        let b = storage_key(b"same bytes", "a.png");
        let c = storage_key(b"other bytes", "a.png");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.ends_with("/a.png"));
        assert_eq!(a.split('/').next().unwrap().len(), DIGEST_PREFIX_LEN);
    }

    #[tokio::test]
    async fn test_store_rejects_disallowed_types() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalFileStorage::new(dir.path().to_path_buf(), "/files".to_string());

        let err = UploadService::store(&storage, "script.sh", "text/x-shellscript", b"echo")
            .await
            .unwrap_err();
        assert_eq!(err.status.as_u16(), 400);
    }

    #[tokio::test]
    async fn test_store_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalFileStorage::new(dir.path().to_path_buf(), "/files".to_string());

        let response = UploadService::store(&storage, "diagram.png", "image/png", b"png")
            .await
            .unwrap();

        assert_eq!(response.name, "diagram.png");
        assert_eq!(response.size, 3);
        assert_eq!(response.url, format!("/files/{}", response.key));
        assert!(dir.path().join(&response.key).exists());
    }
}
