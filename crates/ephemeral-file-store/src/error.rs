//! Error types for the ephemeral file store.

use std::path::PathBuf;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur during blob storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No blob exists under the given file name
    #[error("Blob not found: {file_name}")]
    NotFound { file_name: String },

    /// Base directory creation failed
    #[error("Failed to create directory: {path:?} - {source}")]
    DirectoryCreation {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl StoreError {
    /// Whether this error means the blob simply does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
