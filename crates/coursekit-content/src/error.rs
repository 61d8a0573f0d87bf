use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("Malformed front matter in {path}: {message}")]
    Parse { path: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ContentError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
