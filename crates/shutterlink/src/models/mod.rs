//! API data types
//!
//! Response bodies for the HTTP endpoints. Field names are part of the wire
//! format consumed by the upload frontend, so renames here are breaking.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Body of a successful `POST /api/upload`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub success: bool,
    pub message: String,
    /// The QR code as a `data:image/png;base64,…` URI, ready for an `<img>` tag
    pub qr_code: String,
    /// Public URL the QR code points at
    pub image_url: String,
    pub image_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

/// Body of a successful `POST /api/preview`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewResponse {
    pub success: bool,
    /// The uploaded bytes as a `data:{mime};base64,…` URI
    pub preview: String,
}

/// Body of `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
        }
    }
}
