use std::env;
use std::path::PathBuf;

/// 50 MiB, the ceiling the upload form enforces client-side.
const DEFAULT_MAX_BYTES: usize = 50 * 1024 * 1024;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadConfig {
    pub upload_dir: PathBuf,
    pub base_url: String,
    pub max_bytes: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("storage/uploads"),
            base_url: "http://localhost:3000/files".to_string(),
            max_bytes: DEFAULT_MAX_BYTES,
        }
    }
}

impl UploadConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            upload_dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.upload_dir),
            base_url: env::var("UPLOAD_BASE_URL").unwrap_or(defaults.base_url),
            max_bytes: env::var("UPLOAD_MAX_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|v| *v > 0)
                .unwrap_or(defaults.max_bytes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limit_is_fifty_mib() {
        assert_eq!(UploadConfig::default().max_bytes, 52_428_800);
    }
}
