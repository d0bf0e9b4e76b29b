//! Image sharing lifecycle
//!
//! Ties the core pieces together: validated uploads land in the blob store
//! and registry, resolution enforces the retention window, and expired
//! uploads are swept away together with their blobs. Handlers stay thin and
//! delegate everything here.

use std::time::Duration;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use chrono::{DateTime, Utc};
use ephemeral_file_store::{BlobStore, RetentionPolicy, UploadRecord, UploadRegistry};
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::errors::{AppError, AppResult, ValidationError};
use crate::qr::QrEncoder;
use crate::validation::{self, UploadValidator};

/// Receipt handed back for a successful ingest.
#[derive(Debug, Clone)]
pub struct IngestReceipt {
    pub id: Uuid,
    /// Public URL the QR code points at
    pub public_url: String,
    /// QR code rendering of `public_url` as a PNG data URI
    pub qr_data_uri: String,
    pub expires_at: DateTime<Utc>,
}

/// A validated upload rendered as an inline data URI, nothing stored.
#[derive(Debug, Clone)]
pub struct PreviewReceipt {
    pub data_uri: String,
}

/// A resolved image ready to serve.
#[derive(Debug, Clone)]
pub struct ResolvedImage {
    pub content: Vec<u8>,
    pub content_type: &'static str,
}

/// Orchestrates the upload lifecycle end to end.
///
/// Cloning is cheap; every clone shares the same registry and blob store,
/// so one instance can serve request handlers and a background sweeper at
/// the same time.
#[derive(Debug, Clone)]
pub struct ImageShareService {
    validator: UploadValidator,
    blobs: BlobStore,
    registry: UploadRegistry,
    retention: RetentionPolicy,
    encoder: QrEncoder,
    base_url: String,
}

impl ImageShareService {
    /// Build the service from configuration.
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let retention_window =
            humantime::parse_duration(&config.storage.retention).map_err(|e| {
                AppError::configuration(format!(
                    "Invalid retention '{}': {}",
                    config.storage.retention, e
                ))
            })?;

        Ok(Self {
            validator: UploadValidator::new(config.uploads.max_file_size_bytes()),
            blobs: BlobStore::new(config.storage.upload_path.clone()),
            registry: UploadRegistry::new(),
            retention: RetentionPolicy::new(retention_window),
            encoder: QrEncoder::default(),
            base_url: config.web.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create the upload directory. Called once at startup.
    pub async fn prepare(&self) -> AppResult<()> {
        self.blobs.ensure_base_dir().await?;
        Ok(())
    }

    /// Accept an upload: validate it, persist the bytes, register the
    /// retention window, and hand back the public URL plus its QR code.
    ///
    /// If QR encoding fails the stored blob and record are left in place;
    /// they age out through the normal retention path.
    pub async fn ingest(&self, filename: &str, content: &[u8]) -> AppResult<IngestReceipt> {
        self.validator.validate(filename, content)?;

        let Some(extension) = validation::extension_of(filename) else {
            return Err(ValidationError::UnsupportedType { extension: None }.into());
        };

        let id = Uuid::new_v4();
        let record = UploadRecord::new(id, &extension, Utc::now(), &self.retention);
        let expires_at = record.expires_at;

        self.blobs.store(&record.file_name, content).await?;
        self.registry.insert(id, record).await;

        let public_url = format!("{}/image/{}", self.base_url, id);
        let qr_data_uri = self.encoder.encode_data_uri(&public_url)?;

        info!(
            "Accepted upload {} ({} bytes), expires {}",
            id,
            content.len(),
            expires_at
        );

        Ok(IngestReceipt {
            id,
            public_url,
            qr_data_uri,
            expires_at,
        })
    }

    /// Look up an image by id and return its bytes with the content type it
    /// was uploaded under.
    ///
    /// Every resolve first sweeps expired entries. An id that expires is
    /// reported as [`AppError::Expired`] exactly once, on the resolve that
    /// evicts it; afterwards it is indistinguishable from an id that never
    /// existed and reports [`AppError::NotFound`].
    pub async fn resolve(&self, id: Uuid) -> AppResult<ResolvedImage> {
        let now = Utc::now();

        let swept = self.registry.sweep_expired(now).await;
        let mut requested_was_swept = false;
        for (swept_id, record) in &swept {
            if *swept_id == id {
                requested_was_swept = true;
            }
            self.remove_blob_best_effort(&record.file_name).await;
        }
        if requested_was_swept {
            return Err(AppError::expired(id));
        }

        let Some(record) = self.registry.get(&id).await else {
            return Err(AppError::not_found(id));
        };

        if record.is_expired(now) {
            self.registry.remove(&id).await;
            self.remove_blob_best_effort(&record.file_name).await;
            return Err(AppError::expired(id));
        }

        match self.blobs.read(&record.file_name).await {
            Ok(content) => Ok(ResolvedImage {
                content,
                content_type: validation::content_type_for(&record.extension),
            }),
            Err(e) if e.is_not_found() => {
                warn!("Blob for {} vanished underneath a live record", id);
                self.registry.remove(&id).await;
                Err(AppError::not_found(id))
            }
            Err(e) => Err(AppError::Storage(e)),
        }
    }

    /// Validate an upload and return it as an inline data URI without
    /// storing anything.
    pub async fn preview(&self, filename: &str, content: &[u8]) -> AppResult<PreviewReceipt> {
        self.validator.validate(filename, content)?;

        let Some(extension) = validation::extension_of(filename) else {
            return Err(ValidationError::UnsupportedType { extension: None }.into());
        };

        let mime = validation::content_type_for(&extension);
        Ok(PreviewReceipt {
            data_uri: format!("data:{};base64,{}", mime, STANDARD.encode(content)),
        })
    }

    /// Remove every expired upload and its blob. Returns how many were
    /// removed.
    pub async fn sweep(&self) -> usize {
        let swept = self.registry.sweep_expired(Utc::now()).await;
        for (_, record) in &swept {
            self.remove_blob_best_effort(&record.file_name).await;
        }
        swept.len()
    }

    /// Run the periodic sweep loop. Never returns; meant to be spawned.
    pub async fn start_sweeper(self, sweep_interval: Duration) {
        let mut ticker = interval(sweep_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!("Starting expiry sweeper with interval: {:?}", sweep_interval);

        loop {
            ticker.tick().await;

            let removed = self.sweep().await;
            if removed > 0 {
                info!("Expiry sweep removed {} upload(s)", removed);
            }
        }
    }

    async fn remove_blob_best_effort(&self, file_name: &str) {
        if let Err(e) = self.blobs.remove(file_name).await {
            debug!("Failed to remove blob {}: {}", file_name, e);
        }
    }
}
