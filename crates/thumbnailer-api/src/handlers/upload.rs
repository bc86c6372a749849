use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::{header, HeaderMap},
    response::Response,
    Extension,
};
use thumbnailer_core::AppError;

use crate::error::HttpAppError;
use crate::middleware::RequestId;
use crate::response::success_response;
use crate::state::AppState;
use crate::utils::upload::read_upload;

fn content_length(headers: &HeaderMap) -> Option<usize> {
    headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
}

/// Thumbnail upload handler
///
/// Reads the first file part of a `multipart/form-data` body, resizes it to the
/// configured box and answers with the JPEG as a base64 data URL plus metadata
/// read back from the encoded output.
///
/// # Errors
/// - `AppError::MultipartParse` - body is not readable multipart data (500)
/// - `AppError::MissingFile` / `AppError::EmptyFile` - no usable file part (400)
/// - `AppError::PayloadTooLarge` - file exceeds the upload cap (413)
/// - `AppError::UploadTimeout` - body did not arrive in time (408)
/// - `AppError::ImageDecode` - file is not a decodable image (400)
/// - `AppError::ImageEncode` - thumbnail could not be encoded (500)
#[tracing::instrument(
    skip(state, request_id, headers, multipart),
    fields(request_id = %request_id, operation = "upload_thumbnail")
)]
pub async fn upload_thumbnail(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, HttpAppError> {
    let multipart = multipart?;
    let limits = &state.config.upload;

    let upload = tokio::time::timeout(
        limits.timeout(),
        read_upload(multipart, limits, content_length(&headers)),
    )
    .await
    .map_err(|_| {
        AppError::UploadTimeout(format!(
            "Upload did not complete within {} seconds",
            limits.timeout_secs
        ))
    })??;

    let source_size = upload.size();
    let result = state.thumbnails.generate(upload.data).await?;

    tracing::info!(
        source_size,
        width = result.width,
        height = result.height,
        size = result.size(),
        "Thumbnail generated"
    );

    Ok(success_response(&result))
}
