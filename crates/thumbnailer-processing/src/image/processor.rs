//! Image processor - decoding and inspection of encoded bytes

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, ImageReader, Limits};

use crate::error::TransformError;

/// Format and dimensions read back from encoded image bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImageInfo {
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
}

impl EncodedImageInfo {
    /// Lowercase codec name, e.g. "jpeg" or "png"
    pub fn format_name(&self) -> String {
        format_name(self.format)
    }
}

/// Lowercase codec name for an `ImageFormat`
pub fn format_name(format: ImageFormat) -> String {
    let mime = format.to_mime_type();
    match mime.strip_prefix("image/") {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => format!("{:?}", format).to_lowercase(),
    }
}

pub struct ImageProcessor;

impl ImageProcessor {
    /// Decode an encoded image, guessing its format from the leading bytes.
    ///
    /// Sources wider or taller than `max_dimension` are rejected by the decoder
    /// before pixel memory is allocated.
    pub fn decode(data: &[u8], max_dimension: u32) -> Result<DynamicImage, TransformError> {
        if data.is_empty() {
            return Err(TransformError::Decode("empty image buffer".to_string()));
        }

        let mut reader = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| TransformError::Decode(e.to_string()))?;

        let mut limits = Limits::default();
        limits.max_image_width = Some(max_dimension);
        limits.max_image_height = Some(max_dimension);
        reader.limits(limits);

        let source_format = reader.format();
        let img = reader
            .decode()
            .map_err(|e| TransformError::Decode(e.to_string()))?;

        tracing::debug!(
            source_format = ?source_format,
            width = img.width(),
            height = img.height(),
            "Decoded source image"
        );

        Ok(img)
    }

    /// Read format and dimensions from encoded bytes without decoding pixels
    pub fn inspect(data: &[u8]) -> Result<EncodedImageInfo, TransformError> {
        let reader = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| TransformError::Decode(e.to_string()))?;

        let format = reader
            .format()
            .ok_or_else(|| TransformError::Decode("unrecognized image format".to_string()))?;
        let (width, height) = reader
            .into_dimensions()
            .map_err(|e| TransformError::Decode(e.to_string()))?;

        Ok(EncodedImageInfo {
            format,
            width,
            height,
        })
    }
}
