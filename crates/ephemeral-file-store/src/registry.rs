//! In-memory registry mapping upload identifiers to their metadata.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::retention::RetentionPolicy;

/// Metadata for a single stored upload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadRecord {
    /// File name of the blob on disk, `{id}.{extension}`.
    pub file_name: String,
    /// Lowercase file extension without the leading dot.
    pub extension: String,
    /// When the upload was accepted.
    pub uploaded_at: DateTime<Utc>,
    /// Instant after which the upload is no longer served.
    pub expires_at: DateTime<Utc>,
}

impl UploadRecord {
    /// Build a record for `id`, deriving the blob file name and the expiry
    /// instant from the retention policy.
    #[must_use]
    pub fn new(
        id: Uuid,
        extension: &str,
        uploaded_at: DateTime<Utc>,
        policy: &RetentionPolicy,
    ) -> Self {
        Self {
            file_name: format!("{id}.{extension}"),
            extension: extension.to_string(),
            uploaded_at,
            expires_at: policy.expires_at(uploaded_at),
        }
    }

    /// Whether this record has expired as of `now`.
    ///
    /// Strict comparison: a record is still valid at exactly `expires_at`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Concurrency-safe map of active uploads.
///
/// Cloning is cheap and shares the underlying map, so one registry can be
/// handed to every request handler and to a background sweeper.
#[derive(Debug, Clone, Default)]
pub struct UploadRegistry {
    records: Arc<RwLock<HashMap<Uuid, UploadRecord>>>,
}

impl UploadRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `record` under `id`, replacing any previous entry.
    pub async fn insert(&self, id: Uuid, record: UploadRecord) {
        debug!("Registering upload {} ({})", id, record.file_name);
        self.records.write().await.insert(id, record);
    }

    /// Look up the record for `id`, if present.
    pub async fn get(&self, id: &Uuid) -> Option<UploadRecord> {
        self.records.read().await.get(id).cloned()
    }

    /// Remove and return the record for `id`, if present.
    pub async fn remove(&self, id: &Uuid) -> Option<UploadRecord> {
        self.records.write().await.remove(id)
    }

    /// Number of registered uploads.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether the registry holds no uploads.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Remove every record that has expired as of `now` and return the
    /// removed entries so callers can delete the backing blobs.
    ///
    /// The check-and-remove runs under a single write lock, so each expired
    /// record is handed out exactly once even under concurrent sweeps.
    pub async fn sweep_expired(&self, now: DateTime<Utc>) -> Vec<(Uuid, UploadRecord)> {
        let mut records = self.records.write().await;
        let expired_ids: Vec<Uuid> = records
            .iter()
            .filter(|(_, record)| record.is_expired(now))
            .map(|(id, _)| *id)
            .collect();

        let mut swept = Vec::with_capacity(expired_ids.len());
        for id in expired_ids {
            if let Some(record) = records.remove(&id) {
                swept.push((id, record));
            }
        }

        if !swept.is_empty() {
            debug!("Swept {} expired upload(s)", swept.len());
        }
        swept
    }
}
