//! Flat-directory blob storage backed by the local filesystem.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;

use crate::error::{Result, StoreError};

/// Stores opaque byte blobs as individual files in a single base directory.
///
/// The store knows nothing about retention or metadata; callers pick the
/// file names and decide when blobs are removed.
#[derive(Debug, Clone)]
pub struct BlobStore {
    base_dir: PathBuf,
}

impl BlobStore {
    /// Create a store rooted at `base_dir`.
    ///
    /// The directory is not touched until [`ensure_base_dir`](Self::ensure_base_dir)
    /// or a write operation runs.
    #[must_use]
    pub fn new<P: Into<PathBuf>>(base_dir: P) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// The directory blobs are written under.
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Absolute path of the blob stored under `file_name`.
    #[must_use]
    pub fn path_of(&self, file_name: &str) -> PathBuf {
        self.base_dir.join(file_name)
    }

    /// Create the base directory, including missing parents.
    ///
    /// # Errors
    /// Returns [`StoreError::DirectoryCreation`] if the directory cannot be
    /// created.
    pub async fn ensure_base_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.base_dir)
            .await
            .map_err(|source| StoreError::DirectoryCreation {
                path: self.base_dir.clone(),
                source,
            })
    }

    /// Write `contents` under `file_name`, replacing any existing blob.
    ///
    /// # Errors
    /// Returns an error if the base directory cannot be created or the write
    /// fails.
    pub async fn store<C: AsRef<[u8]>>(&self, file_name: &str, contents: C) -> Result<PathBuf> {
        self.ensure_base_dir().await?;

        let file_path = self.path_of(file_name);
        fs::write(&file_path, contents.as_ref()).await?;

        debug!(
            "Stored blob {} ({} bytes)",
            file_name,
            contents.as_ref().len()
        );
        Ok(file_path)
    }

    /// Read the blob stored under `file_name` into a `Vec<u8>`.
    ///
    /// # Errors
    /// Returns [`StoreError::NotFound`] if no such blob exists, or an I/O
    /// error if the read fails.
    pub async fn read(&self, file_name: &str) -> Result<Vec<u8>> {
        let file_path = self.path_of(file_name);

        match fs::read(&file_path).await {
            Ok(contents) => Ok(contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StoreError::NotFound {
                file_name: file_name.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    /// Remove the blob stored under `file_name`.
    ///
    /// Removing a blob that does not exist is not an error, so removal is
    /// idempotent.
    ///
    /// # Errors
    /// Returns an I/O error if the file exists but cannot be removed.
    pub async fn remove(&self, file_name: &str) -> Result<()> {
        let file_path = self.path_of(file_name);

        match fs::remove_file(&file_path).await {
            Ok(()) => {
                debug!("Removed blob {}", file_name);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Whether a blob exists under `file_name`.
    pub async fn exists(&self, file_name: &str) -> bool {
        fs::try_exists(self.path_of(file_name)).await.unwrap_or(false)
    }
}
