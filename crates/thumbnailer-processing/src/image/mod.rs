//! Image processing module
//!
//! - Decoding and inspection of encoded bytes (processor)
//! - Fixed-box thumbnail generation (thumbnail)

pub mod processor;
pub mod thumbnail;

pub use processor::ImageProcessor;
pub use thumbnail::{ThumbnailSpec, ThumbnailTransformer, TransformResult};
