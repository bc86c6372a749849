//! HTTP error response conversion
//!
//! Handlers return `Result<Response, HttpAppError>`. Any `AppError` converts into
//! `HttpAppError`, which renders the `{ "success": false, "error": ... }` body with
//! the status from `ErrorMetadata` and logs the failure once.

use axum::{
    extract::multipart::{MultipartError, MultipartRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thumbnailer_core::{AppError, ErrorMetadata, LogLevel};
use thumbnailer_processing::TransformError;

use crate::response::UploadResponse;

/// Wrapper type for AppError to implement IntoResponse
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<TransformError> for HttpAppError {
    fn from(err: TransformError) -> Self {
        HttpAppError(AppError::from(err))
    }
}

impl From<MultipartRejection> for HttpAppError {
    fn from(rejection: MultipartRejection) -> Self {
        HttpAppError(AppError::MultipartParse(rejection.body_text()))
    }
}

/// Classify a multipart stream failure.
///
/// axum maps the underlying parser error to a status: 413 for size limits, 4xx for
/// malformed or truncated multipart data, and 5xx when reading the body itself failed
/// (the client went away).
pub fn multipart_error_to_app_error(err: MultipartError) -> AppError {
    let status = err.status();
    let detail = err.body_text();
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!("Upload exceeds the size limit: {}", detail))
    } else if status.is_client_error() {
        AppError::MultipartParse(detail)
    } else {
        AppError::UploadAborted(detail)
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    let code = error.error_code();
    let client_error = error.is_client_error();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type, code, client_error, "Upload failed");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type, code, client_error, "Upload failed");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type, code, client_error, "Upload failed");
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        (
            status,
            Json(UploadResponse::failure(app_error.client_message())),
        )
            .into_response()
    }
}
