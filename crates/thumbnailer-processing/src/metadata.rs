//! Thumbnail metadata as reported to clients

use serde::{Deserialize, Serialize};

/// Format, dimensions and byte size of an encoded thumbnail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThumbnailMetadata {
    pub format: String,
    pub width: u32,
    pub height: u32,
    pub size: usize,
}
