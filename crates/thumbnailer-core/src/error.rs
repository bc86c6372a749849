//! Error types module
//!
//! Every failure reachable from an upload request is represented by `AppError`.
//! Each variant describes its own HTTP presentation through `ErrorMetadata`, so the
//! API layer can turn any error into exactly one JSON response.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for client-caused failures worth noticing
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "IMAGE_DECODE_ERROR")
    fn error_code(&self) -> &'static str;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Multipart parse error: {0}")]
    MultipartParse(String),

    #[error("No file provided")]
    MissingFile,

    #[error("Uploaded file is empty")]
    EmptyFile,

    #[error("File too large: {0}")]
    PayloadTooLarge(String),

    #[error("Upload timed out: {0}")]
    UploadTimeout(String),

    #[error("Upload aborted: {0}")]
    UploadAborted(String),

    #[error("Image decode error: {0}")]
    ImageDecode(String),

    #[error("Image encode error: {0}")]
    ImageEncode(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Static metadata for each variant: (http_status, error_code, log_level).
fn app_error_static_metadata(err: &AppError) -> (u16, &'static str, LogLevel) {
    match err {
        AppError::MultipartParse(_) => (500, "UPLOAD_PARSE_ERROR", LogLevel::Error),
        AppError::MissingFile => (400, "NO_FILE", LogLevel::Debug),
        AppError::EmptyFile => (400, "EMPTY_FILE", LogLevel::Debug),
        AppError::PayloadTooLarge(_) => (413, "PAYLOAD_TOO_LARGE", LogLevel::Debug),
        AppError::UploadTimeout(_) => (408, "UPLOAD_TIMEOUT", LogLevel::Warn),
        AppError::UploadAborted(_) => (400, "UPLOAD_ABORTED", LogLevel::Debug),
        AppError::ImageDecode(_) => (400, "IMAGE_DECODE_ERROR", LogLevel::Warn),
        AppError::ImageEncode(_) => (500, "IMAGE_ENCODE_ERROR", LogLevel::Error),
        AppError::Internal(_) => (500, "INTERNAL_ERROR", LogLevel::Error),
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).2
    }

    fn client_message(&self) -> String {
        match self {
            // Parser diagnostics stay in the logs.
            AppError::MultipartParse(_) => "Upload failed".to_string(),
            AppError::MissingFile => "No file provided".to_string(),
            AppError::EmptyFile => "Uploaded file is empty".to_string(),
            AppError::PayloadTooLarge(ref msg) => msg.clone(),
            AppError::UploadTimeout(ref msg) => msg.clone(),
            AppError::UploadAborted(ref msg) => msg.clone(),
            AppError::ImageDecode(ref msg) => format!("Failed to decode image: {}", msg),
            AppError::ImageEncode(ref msg) => format!("Failed to encode thumbnail: {}", msg),
            AppError::Internal(_) => "Internal server error".to_string(),
        }
    }
}

impl AppError {
    /// Get the error type name for logs
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::MultipartParse(_) => "MultipartParse",
            AppError::MissingFile => "MissingFile",
            AppError::EmptyFile => "EmptyFile",
            AppError::PayloadTooLarge(_) => "PayloadTooLarge",
            AppError::UploadTimeout(_) => "UploadTimeout",
            AppError::UploadAborted(_) => "UploadAborted",
            AppError::ImageDecode(_) => "ImageDecode",
            AppError::ImageEncode(_) => "ImageEncode",
            AppError::Internal(_) => "Internal",
        }
    }

    /// Whether the failure was triggered by client input rather than the server
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.http_status_code())
    }
}
