//! Business logic services

pub mod image_share;

pub use image_share::{ImageShareService, IngestReceipt, PreviewReceipt, ResolvedImage};
