//! # Ephemeral File Store
//!
//! A small file storage library with time-bounded retention: blobs written
//! through it are expected to disappear again after a fixed window.
//!
//! The library splits the problem into three pieces that callers wire
//! together: a [`BlobStore`] that owns a flat directory of files, an
//! [`UploadRegistry`] that tracks metadata for each stored blob behind an
//! async lock, and a [`RetentionPolicy`] that stamps every record with its
//! expiry instant at creation time. Expiry is evaluated lazily; callers
//! decide when to sweep, and the registry guarantees each expired record is
//! handed out exactly once so the backing blob can be deleted without races.
//!
//! ## Features
//!
//! - **Flat blob storage**: one base directory, caller-chosen file names
//! - **Concurrency-safe registry**: share one registry across tasks by cloning
//! - **Fixed retention windows**: expiry computed once, at registration
//! - **Exactly-once sweeps**: concurrent sweeps never hand out the same record twice
//! - **Idempotent removal**: deleting an already-deleted blob is not an error
//!
//! ## Basic Usage
//!
//! ```rust
//! use ephemeral_file_store::{BlobStore, RetentionPolicy, UploadRecord, UploadRegistry};
//! use std::time::Duration;
//! use uuid::Uuid;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = BlobStore::new("/var/lib/myapp/uploads");
//! let registry = UploadRegistry::new();
//! let policy = RetentionPolicy::new(Duration::from_secs(24 * 60 * 60)); // 24 hours
//!
//! // Accept an upload: write the blob, then register its metadata.
//! let id = Uuid::new_v4();
//! let record = UploadRecord::new(id, "png", chrono::Utc::now(), &policy);
//! store.store(&record.file_name, b"image bytes").await?;
//! registry.insert(id, record).await;
//!
//! // Later: drop everything past its expiry instant.
//! for (_, expired) in registry.sweep_expired(chrono::Utc::now()).await {
//!     store.remove(&expired.file_name).await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod blob;
pub mod error;
pub mod registry;
pub mod retention;

pub use blob::BlobStore;
pub use error::{Result, StoreError};
pub use registry::{UploadRecord, UploadRegistry};
pub use retention::RetentionPolicy;

// Re-export commonly used types
pub use std::time::Duration;
