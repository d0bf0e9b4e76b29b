//! QR code generation
//!
//! Renders text (in practice, image URLs) into scannable two-tone PNG codes.
//! The defaults mirror what phone cameras handle comfortably: low error
//! correction for maximum capacity, 10px modules, and the standard 4-module
//! quiet zone around the code.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use image::Luma;
use qrcode::types::QrError;
use qrcode::{EcLevel, QrCode};

use crate::errors::EncodeError;

/// Renders text into QR code PNGs.
#[derive(Debug, Clone, Copy)]
pub struct QrEncoder {
    ec_level: EcLevel,
    module_size: u32,
}

impl QrEncoder {
    /// Create an encoder with an explicit error correction level and module
    /// size in pixels.
    pub fn new(ec_level: EcLevel, module_size: u32) -> Self {
        Self {
            ec_level,
            module_size,
        }
    }

    /// Encode `text` into a black-on-white PNG.
    ///
    /// The QR version (grid size) is chosen automatically for the input
    /// length; input beyond what any version can hold at the configured
    /// error correction level fails with [`EncodeError::DataTooLong`].
    pub fn encode_png(&self, text: &str) -> Result<Vec<u8>, EncodeError> {
        let code =
            QrCode::with_error_correction_level(text, self.ec_level).map_err(|e| match e {
                QrError::DataTooLong => EncodeError::DataTooLong { length: text.len() },
                other => EncodeError::Qr(other),
            })?;

        let image = code
            .render::<Luma<u8>>()
            .module_dimensions(self.module_size, self.module_size)
            .build();

        let mut png = Vec::new();
        image.write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)?;
        Ok(png)
    }

    /// Encode `text` into a `data:image/png;base64,…` URI that can be dropped
    /// straight into an `<img>` tag.
    pub fn encode_data_uri(&self, text: &str) -> Result<String, EncodeError> {
        let png = self.encode_png(text)?;
        Ok(format!("data:image/png;base64,{}", STANDARD.encode(png)))
    }
}

impl Default for QrEncoder {
    /// Defaults: low error correction, 10px modules.
    fn default() -> Self {
        Self::new(EcLevel::L, 10)
    }
}
