//! Upload validation
//!
//! Every upload passes through [`UploadValidator::validate`] before any bytes
//! touch the store. Checks run in a fixed order and the first failure wins,
//! so a payload that is both oversized and misnamed reports the name problem.

use std::collections::HashSet;

use crate::errors::ValidationError;

/// Extensions accepted by default: browser-displayable raster formats.
pub const DEFAULT_ALLOWED_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "webp"];

/// Default maximum upload size (10MB).
pub const DEFAULT_MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// Validates upload filenames and payloads.
#[derive(Debug, Clone)]
pub struct UploadValidator {
    allowed_extensions: HashSet<String>,
    max_file_size: usize,
}

impl UploadValidator {
    /// Create a validator accepting the default image extensions up to
    /// `max_file_size` bytes.
    pub fn new(max_file_size: usize) -> Self {
        Self {
            allowed_extensions: DEFAULT_ALLOWED_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            max_file_size,
        }
    }

    /// Validate an upload, checking in order: a file name is present, the
    /// extension is an allowed image type, the payload fits the size limit,
    /// and the bytes actually decode as an image.
    ///
    /// The decode check catches renamed non-images and truncated files; a
    /// zero-byte payload fails it too.
    pub fn validate(&self, filename: &str, content: &[u8]) -> Result<(), ValidationError> {
        if filename.is_empty() {
            return Err(ValidationError::MissingFile);
        }

        let extension = extension_of(filename);
        match &extension {
            Some(ext) if self.allowed_extensions.contains(ext) => {}
            _ => return Err(ValidationError::UnsupportedType { extension }),
        }

        if content.len() > self.max_file_size {
            return Err(ValidationError::TooLarge {
                size: content.len(),
                max_size: self.max_file_size,
            });
        }

        if let Err(e) = image::load_from_memory(content) {
            return Err(ValidationError::CorruptImage {
                reason: e.to_string(),
            });
        }

        Ok(())
    }
}

impl Default for UploadValidator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FILE_SIZE)
    }
}

/// Lower-cased extension of `filename`: the text after the final dot, or
/// `None` for names without one.
pub fn extension_of(filename: &str) -> Option<String> {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
}

/// MIME type served for a stored extension.
pub fn content_type_for(extension: &str) -> &'static str {
    match extension.to_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_png() -> Vec<u8> {
        let img = image::RgbImage::new(1, 1);
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn accepts_a_valid_png() {
        let validator = UploadValidator::default();
        assert!(validator.validate("photo.png", &tiny_png()).is_ok());
    }

    #[test]
    fn uppercase_extension_is_accepted() {
        let validator = UploadValidator::default();
        assert!(validator.validate("PHOTO.PNG", &tiny_png()).is_ok());
    }

    #[test]
    fn empty_filename_is_missing_file() {
        let validator = UploadValidator::default();
        let err = validator.validate("", &tiny_png()).unwrap_err();
        assert!(matches!(err, ValidationError::MissingFile));
        assert_eq!(err.to_string(), "No file selected.");
    }

    #[test]
    fn text_file_is_unsupported() {
        let validator = UploadValidator::default();
        let err = validator.validate("notes.txt", b"hello").unwrap_err();
        assert!(matches!(
            err,
            ValidationError::UnsupportedType {
                extension: Some(ext)
            } if ext == "txt"
        ));
    }

    #[test]
    fn filename_without_extension_is_unsupported() {
        let validator = UploadValidator::default();
        let err = validator.validate("photo", &tiny_png()).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::UnsupportedType { extension: None }
        ));
    }

    #[test]
    fn oversize_payload_is_too_large() {
        let validator = UploadValidator::new(16);
        let err = validator.validate("photo.png", &[0u8; 17]).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::TooLarge {
                size: 17,
                max_size: 16
            }
        ));
    }

    #[test]
    fn garbage_bytes_are_corrupt() {
        let validator = UploadValidator::default();
        let err = validator
            .validate("photo.png", b"definitely not an image")
            .unwrap_err();
        assert!(matches!(err, ValidationError::CorruptImage { .. }));
    }

    #[test]
    fn empty_payload_is_corrupt() {
        let validator = UploadValidator::default();
        let err = validator.validate("photo.png", b"").unwrap_err();
        assert!(matches!(err, ValidationError::CorruptImage { .. }));
    }

    #[test]
    fn extension_check_wins_over_size_check() {
        let validator = UploadValidator::new(16);
        let err = validator.validate("notes.txt", &[0u8; 17]).unwrap_err();
        assert!(matches!(err, ValidationError::UnsupportedType { .. }));
    }

    #[test]
    fn extension_of_handles_edge_cases() {
        assert_eq!(extension_of("photo.PNG"), Some("png".to_string()));
        assert_eq!(extension_of("a.b.jpeg"), Some("jpeg".to_string()));
        assert_eq!(extension_of(".webp"), Some("webp".to_string()));
        assert_eq!(extension_of("trailing."), Some(String::new()));
        assert_eq!(extension_of("nodot"), None);
    }

    #[test]
    fn content_types_match_extensions() {
        assert_eq!(content_type_for("png"), "image/png");
        assert_eq!(content_type_for("jpg"), "image/jpeg");
        assert_eq!(content_type_for("JPEG"), "image/jpeg");
        assert_eq!(content_type_for("gif"), "image/gif");
        assert_eq!(content_type_for("webp"), "image/webp");
        assert_eq!(content_type_for("bin"), "application/octet-stream");
    }
}
