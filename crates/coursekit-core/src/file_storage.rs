//! File storage abstraction for uploaded course assets.
//!
//! Handlers talk to [`FileStorage`]; the only backend shipped is
//! [`LocalFileStorage`], which writes under a directory that the router also
//! serves at `/files`.
//!
//! ```ignore
//! use coursekit_core::file_storage::{FileStorage, LocalFileStorage};
//!
//! let storage = LocalFileStorage::new(
//!     PathBuf::from("storage/uploads"),
//!     "http://localhost:3000/files".to_string(),
//! );
//!
//! storage.check_upload("image/png", bytes.len())?;
//! let key = storage.save("3f9a1c2b7d4e/thumbnail.png", &bytes).await?;
//! let url = storage.get_url(&key)?;
//! ```

use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use tokio::fs;

pub type StorageFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StorageError>> + Send + 'a>>;

/// Default upload ceiling: 50 MiB.
pub const DEFAULT_MAX_FILE_SIZE: usize = 50 * 1024 * 1024;

/// MIME types accepted for uploads unless configured otherwise.
pub const DEFAULT_ALLOWED_MIME_TYPES: &[&str] = &[
    "image/png",
    "image/jpeg",
    "image/gif",
    "image/webp",
    "image/avif",
    "application/pdf",
];

pub trait FileStorage: Send + Sync {
    /// Store `content` under `key` and return the key.
    fn save<'a>(&'a self, key: &'a str, content: &'a [u8]) -> StorageFuture<'a, String>;

    /// Public URL for a stored key.
    fn get_url(&self, key: &str) -> Result<String, StorageError>;

    /// Rejects an upload before any bytes are written.
    fn check_upload(&self, mime_type: &str, len: usize) -> Result<(), StorageError>;
}

#[derive(Debug)]
pub enum StorageError {
    InvalidFileSize { max_bytes: usize },
    InvalidMimeType {
        received: String,
        allowed: Vec<String>,
    },
    IoError(std::io::Error),
    InvalidKey(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFileSize { max_bytes } => {
                write!(f, "File exceeds maximum size of {} bytes", max_bytes)
            }
            Self::InvalidMimeType { received, allowed } => write!(
                f,
                "MIME type '{}' not allowed. Allowed types: {}",
                received,
                allowed.join(", ")
            ),
            Self::IoError(e) => write!(f, "I/O error: {}", e),
            Self::InvalidKey(msg) => write!(f, "Invalid storage key: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        Self::IoError(e)
    }
}

impl StorageError {
    /// Whether the failure was caused by the client's input.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::IoError(_))
    }
}

#[derive(Clone, Debug)]
pub struct LocalFileStorage {
    base_dir: PathBuf,
    base_url: String,
    max_file_size: usize,
    allowed_mime_types: Vec<String>,
}

impl LocalFileStorage {
    pub fn new(base_dir: PathBuf, base_url: String) -> Self {
        Self::with_max_size(base_dir, base_url, DEFAULT_MAX_FILE_SIZE)
    }

    pub fn with_max_size(base_dir: PathBuf, base_url: String, max_file_size: usize) -> Self {
        Self {
            base_dir,
            base_url,
            max_file_size,
            allowed_mime_types: DEFAULT_ALLOWED_MIME_TYPES
                .iter()
                .map(|m| m.to_string())
                .collect(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn max_file_size(&self) -> usize {
        self.max_file_size
    }

    /// Keys are relative paths of `[A-Za-z0-9._-]` segments.
    fn validate_key(key: &str) -> Result<(), StorageError> {
        if key.is_empty() || key.contains("..") || key.starts_with('/') {
            return Err(StorageError::InvalidKey(
                "Key must not be empty, contain '..', or start with '/'".to_string(),
            ));
        }

        if !key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '/' | '.'))
        {
            return Err(StorageError::InvalidKey(
                "Key contains invalid characters".to_string(),
            ));
        }

        Ok(())
    }
}

impl FileStorage for LocalFileStorage {
    fn save<'a>(&'a self, key: &'a str, content: &'a [u8]) -> StorageFuture<'a, String> {
        Box::pin(async move {
            Self::validate_key(key)?;

            if content.len() > self.max_file_size {
                return Err(StorageError::InvalidFileSize {
                    max_bytes: self.max_file_size,
                });
            }

            let file_path = self.base_dir.join(key);
            if let Some(parent) = file_path.parent() {
                fs::create_dir_all(parent).await?;
            }
            fs::write(&file_path, content).await?;

            Ok(key.to_string())
        })
    }

    fn get_url(&self, key: &str) -> Result<String, StorageError> {
        Self::validate_key(key)?;
        Ok(format!("{}/{}", self.base_url.trim_end_matches('/'), key))
    }

    fn check_upload(&self, mime_type: &str, len: usize) -> Result<(), StorageError> {
        if len > self.max_file_size {
            return Err(StorageError::InvalidFileSize {
                max_bytes: self.max_file_size,
            });
        }

        let essence = mime_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        if !self.allowed_mime_types.iter().any(|m| *m == essence) {
            return Err(StorageError::InvalidMimeType {
                received: mime_type.to_string(),
                allowed: self.allowed_mime_types.clone(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage(dir: &Path) -> LocalFileStorage {
        LocalFileStorage::with_max_size(
            dir.to_path_buf(),
            "http://localhost:3000/files/".to_string(),
            16,
        )
    }

    #[test]
    fn test_validate_key_accepts_nested_keys() {
        assert!(LocalFileStorage::validate_key("ab12cd34/thumbnail.png").is_ok());
        assert!(LocalFileStorage::validate_key("courses/intro_video-1.webp").is_ok());
    }

    #[test]
    fn test_validate_key_rejects_traversal_and_absolute() {
        assert!(LocalFileStorage::validate_key("../../etc/passwd").is_err());
        assert!(LocalFileStorage::validate_key("/etc/passwd").is_err());
        assert!(LocalFileStorage::validate_key("a b.png").is_err());
        assert!(LocalFileStorage::validate_key("").is_err());
    }

    #[test]
    fn test_get_url_trims_trailing_slash() {
        let dir = tempfile::tempdir().unwrap();
        let url = storage(dir.path()).get_url("ab/logo.png").unwrap();
        assert_eq!(url, "http://localhost:3000/files/ab/logo.png");
    }

    #[test]
    fn test_check_upload() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(dir.path());

        assert!(storage.check_upload("image/png", 10).is_ok());
        assert!(storage.check_upload("IMAGE/JPEG; charset=binary", 10).is_ok());
        assert!(matches!(
            storage.check_upload("image/svg+xml", 10),
            Err(StorageError::InvalidMimeType { .. })
        ));
        assert!(matches!(
            storage.check_upload("image/png", 17),
            Err(StorageError::InvalidFileSize { max_bytes: 16 })
        ));
    }

    #[tokio::test]
    async fn test_save_writes_under_base_dir() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(dir.path());

        let key = storage.save("ab/file.png", b"png-bytes").await.unwrap();
        assert_eq!(key, "ab/file.png");
        assert_eq!(
            std::fs::read(dir.path().join("ab/file.png")).unwrap(),
            b"png-bytes"
        );

        assert!(matches!(
            storage.save("../escape.png", b"x").await,
            Err(StorageError::InvalidKey(_))
        ));
    }

    #[tokio::test]
    async fn test_save_rejects_oversized() {
        let dir = tempfile::tempdir().unwrap();
        let result = storage(dir.path()).save("big.png", &[0u8; 32]).await;
        assert!(matches!(result, Err(StorageError::InvalidFileSize { .. })));
    }
}
