use std::panic::{self, AssertUnwindSafe};

use bytes::Bytes;
use image::DynamicImage;

use crate::error::TransformError;

/// Output format for thumbnails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Jpeg,
}

impl OutputFormat {
    /// Codec name as reported in response metadata
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpeg",
        }
    }

    pub fn to_mime_type(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "image/jpeg",
        }
    }
}

/// JPEG encoder backed by mozjpeg
pub struct JpegEncoder;

impl JpegEncoder {
    /// Encode to JPEG with progressive mode and optimized Huffman tables.
    ///
    /// `quality` must be in 1..=100.
    pub fn encode(img: &DynamicImage, quality: u8) -> Result<Bytes, TransformError> {
        if !(1..=100).contains(&quality) {
            return Err(TransformError::Encode(format!(
                "JPEG quality must be between 1 and 100, got {}",
                quality
            )));
        }

        let rgb_img = img.to_rgb8();
        let (width, height) = rgb_img.dimensions();
        if width == 0 || height == 0 {
            return Err(TransformError::Encode(format!(
                "cannot encode a {}x{} image",
                width, height
            )));
        }

        // libjpeg reports fatal errors by unwinding out of its error handler.
        let result = panic::catch_unwind(AssertUnwindSafe(|| -> std::io::Result<Vec<u8>> {
            let mut comp = mozjpeg::Compress::new(mozjpeg::ColorSpace::JCS_RGB);
            comp.set_size(width as usize, height as usize);
            comp.set_quality(quality as f32);
            comp.set_progressive_mode();
            comp.set_optimize_coding(true);

            let mut comp = comp.start_compress(Vec::new())?;
            comp.write_scanlines(&rgb_img)?;
            comp.finish()
        }));

        match result {
            Ok(Ok(jpeg_data)) => Ok(Bytes::from(jpeg_data)),
            Ok(Err(e)) => Err(TransformError::Encode(e.to_string())),
            Err(_) => Err(TransformError::Encode("JPEG encoder aborted".to_string())),
        }
    }
}
