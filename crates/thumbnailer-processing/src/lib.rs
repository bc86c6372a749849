//! Thumbnail processing
//!
//! Decode an uploaded image, resize it to a fixed box and re-encode it as JPEG.
//! Everything here is synchronous and CPU-bound; callers are expected to run it
//! on a blocking-safe thread.

pub mod compression;
pub mod error;
pub mod image;
pub mod metadata;

pub use compression::{JpegEncoder, OutputFormat};
pub use error::TransformError;
pub use crate::image::{ImageProcessor, ThumbnailSpec, ThumbnailTransformer, TransformResult};
pub use metadata::ThumbnailMetadata;
