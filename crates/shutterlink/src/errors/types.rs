//! Error type definitions for the Shutterlink application
//!
//! This module defines all error types used throughout the application,
//! providing a hierarchical error system that makes debugging and error
//! handling more straightforward.

use thiserror::Error;
use uuid::Uuid;

use ephemeral_file_store::StoreError;

/// Top-level application error type
///
/// This enum represents all possible errors that can occur in the application.
/// It uses `thiserror` to provide automatic error trait implementations and
/// proper error chaining.
#[derive(Error, Debug)]
pub enum AppError {
    /// Upload validation rejections
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// No active image under the given identifier
    #[error("Not found: image with id {id}")]
    NotFound { id: Uuid },

    /// The image existed but its retention window has passed
    #[error("Expired: image with id {id}")]
    Expired { id: Uuid },

    /// Blob storage failures
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    /// QR code generation failures
    #[error("Encoding error: {0}")]
    Encoding(#[from] EncodeError),

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Upload validation rejections
///
/// The display strings double as the user-facing `error` field of the JSON
/// responses, so they are phrased for end users rather than operators.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// The upload carried no usable file name. A request without a `file`
    /// field at all never reaches the validator; the handler rejects it with
    /// "No file provided." before validation runs.
    #[error("No file selected.")]
    MissingFile,

    /// The file extension is not an allowed image type
    #[error("Invalid file type. Allowed: png, jpg, jpeg, gif, webp")]
    UnsupportedType { extension: Option<String> },

    /// The payload exceeds the configured maximum size
    #[error("File size exceeds {}MB limit.", .max_size / (1024 * 1024))]
    TooLarge { size: usize, max_size: usize },

    /// The payload does not decode as an image
    #[error("Invalid image file: {reason}")]
    CorruptImage { reason: String },
}

/// QR code generation failures
#[derive(Error, Debug)]
pub enum EncodeError {
    /// The payload exceeds QR capacity at the configured error correction level
    #[error("Data too long for a QR code: {length} bytes")]
    DataTooLong { length: usize },

    /// Other QR construction failures
    #[error("QR construction failed: {0:?}")]
    Qr(qrcode::types::QrError),

    /// PNG serialization of the rendered code failed
    #[error("PNG encoding failed: {0}")]
    Png(#[from] image::ImageError),
}

/// Convenience methods for creating common error types
impl AppError {
    /// Create a not-found error for an image id
    pub fn not_found(id: Uuid) -> Self {
        Self::NotFound { id }
    }

    /// Create an expired error for an image id
    pub fn expired(id: Uuid) -> Self {
        Self::Expired { id }
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}
