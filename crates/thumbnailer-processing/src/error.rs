use thumbnailer_core::AppError;

/// Failures of the decode → resize → encode stage
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransformError {
    /// The input could not be decoded (empty, corrupt or unsupported format)
    #[error("{0}")]
    Decode(String),

    /// Resizing or encoding failed after a successful decode
    #[error("{0}")]
    Encode(String),
}

impl From<TransformError> for AppError {
    fn from(err: TransformError) -> Self {
        match err {
            TransformError::Decode(msg) => AppError::ImageDecode(msg),
            TransformError::Encode(msg) => AppError::ImageEncode(msg),
        }
    }
}
