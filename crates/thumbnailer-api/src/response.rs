//! JSON bodies returned by the upload endpoint

use axum::{http::StatusCode, response::IntoResponse, response::Response, Json};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use thumbnailer_processing::{ThumbnailMetadata, TransformResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadSuccess {
    pub success: bool,
    pub image_url: String,
    pub metadata: ThumbnailMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadFailure {
    pub success: bool,
    pub error: String,
}

/// Body of every `/upload` response; the `success` flag tells the two shapes apart
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UploadResponse {
    Success(UploadSuccess),
    Failure(UploadFailure),
}

impl UploadResponse {
    pub fn success(result: &TransformResult) -> Self {
        UploadResponse::Success(UploadSuccess {
            success: true,
            image_url: data_url(result.output_format.to_mime_type(), &result.data),
            metadata: result.metadata(),
        })
    }

    pub fn failure(message: impl Into<String>) -> Self {
        UploadResponse::Failure(UploadFailure {
            success: false,
            error: message.into(),
        })
    }
}

/// `data:<mime>;base64,<payload>` with the standard padded alphabet
pub fn data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

pub fn success_response(result: &TransformResult) -> Response {
    (StatusCode::OK, Json(UploadResponse::success(result))).into_response()
}
