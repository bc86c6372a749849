//! Fixed-box thumbnail generation
//!
//! The source is scaled non-uniformly to exactly `width x height`; there is no
//! cropping and no letterboxing, so the aspect ratio of the source is not kept.

use bytes::Bytes;
use image::imageops::FilterType;
use thumbnailer_core::ThumbnailConfig;

use super::processor::ImageProcessor;
use crate::compression::{JpegEncoder, OutputFormat};
use crate::error::TransformError;
use crate::metadata::ThumbnailMetadata;

/// Target box and encoder quality for one transform call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThumbnailSpec {
    pub width: u32,
    pub height: u32,
    /// JPEG quality (1-100)
    pub quality: u8,
    /// Largest accepted source width/height
    pub max_source_dimension: u32,
}

impl From<&ThumbnailConfig> for ThumbnailSpec {
    fn from(config: &ThumbnailConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            quality: config.quality,
            max_source_dimension: config.max_source_dimension,
        }
    }
}

impl Default for ThumbnailSpec {
    fn default() -> Self {
        ThumbnailSpec::from(&ThumbnailConfig::default())
    }
}

/// Encoded thumbnail plus what was read back from it
#[derive(Debug, Clone)]
pub struct TransformResult {
    pub data: Bytes,
    pub output_format: OutputFormat,
    /// Format name detected in the encoded bytes
    pub format: String,
    pub width: u32,
    pub height: u32,
}

impl TransformResult {
    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn metadata(&self) -> ThumbnailMetadata {
        ThumbnailMetadata {
            format: self.format.clone(),
            width: self.width,
            height: self.height,
            size: self.size(),
        }
    }
}

pub struct ThumbnailTransformer;

impl ThumbnailTransformer {
    /// Decode `buffer`, resize it to the spec's box and encode it as JPEG.
    ///
    /// Metadata in the result comes from a second pass over the encoded bytes,
    /// so it always describes the output, never the upload.
    pub fn transform(buffer: &[u8], spec: &ThumbnailSpec) -> Result<TransformResult, TransformError> {
        let source = ImageProcessor::decode(buffer, spec.max_source_dimension)?;

        if spec.width == 0 || spec.height == 0 {
            return Err(TransformError::Encode(format!(
                "invalid target dimensions {}x{}",
                spec.width, spec.height
            )));
        }

        let resized = source.resize_exact(spec.width, spec.height, FilterType::Lanczos3);
        drop(source);

        let output_format = OutputFormat::Jpeg;
        let data = JpegEncoder::encode(&resized, spec.quality)?;

        let info = ImageProcessor::inspect(&data).map_err(|e| {
            TransformError::Encode(format!("encoded thumbnail is unreadable: {}", e))
        })?;

        tracing::debug!(
            output_format = output_format.as_str(),
            width = info.width,
            height = info.height,
            size = data.len(),
            quality = spec.quality,
            "Thumbnail encoded"
        );

        Ok(TransformResult {
            format: info.format_name(),
            width: info.width,
            height: info.height,
            output_format,
            data,
        })
    }
}
