use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Storage root not found: {}", .0.display())]
    MissingRoot(PathBuf),

    #[error("Node not found: {0}")]
    NotFound(String),

    #[error("Node already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid document {path}: {source}")]
    Document {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid document {path}: expected a JSON object")]
    NotAnObject { path: String },

    #[error("{0}")]
    Other(String),
}

impl StoreError {
    pub fn not_found(path: impl ToString) -> Self {
        Self::NotFound(path.to_string())
    }

    pub fn already_exists(path: impl ToString) -> Self {
        Self::AlreadyExists(path.to_string())
    }

    /// True when the failure means "nothing there", which callers treat as
    /// an empty node rather than a hard error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound(_) => true,
            Self::IoError(err) => err.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}
