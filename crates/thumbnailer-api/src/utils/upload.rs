//! Reading the uploaded file out of a multipart body
//!
//! The body is consumed as a stream of chunks. Every wait for the next chunk is
//! bounded by the idle timeout and the running total is checked against the upload
//! cap before the chunk is appended, so a slow or oversized upload is cut off
//! without buffering more than the cap.

use std::time::Duration;

use axum::extract::Multipart;
use futures::{Stream, StreamExt};
use thumbnailer_core::{AppError, UploadLimits};

use crate::error::multipart_error_to_app_error;

/// Upper bound on the buffer reserved up front from a client-supplied size hint
const MAX_PREALLOC_BYTES: usize = 1024 * 1024;

/// The single file part taken from an upload
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub field_name: Option<String>,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

impl UploadedFile {
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("upload exceeds the limit of {limit} bytes")]
pub struct LimitExceeded {
    pub limit: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum AccumulateError<E> {
    #[error(transparent)]
    TooLarge(#[from] LimitExceeded),

    #[error("no data received for {0:?}")]
    IdleTimeout(Duration),

    #[error("stream error: {0}")]
    Stream(E),
}

/// Size-capped buffer for one file part
#[derive(Debug)]
pub struct FileAccumulator {
    buffer: Vec<u8>,
    max_bytes: usize,
}

impl FileAccumulator {
    pub fn new(max_bytes: usize, size_hint: Option<usize>) -> Self {
        let capacity = size_hint
            .unwrap_or(0)
            .min(max_bytes)
            .min(MAX_PREALLOC_BYTES);
        Self {
            buffer: Vec::with_capacity(capacity),
            max_bytes,
        }
    }

    /// Append a chunk, refusing it if the total would pass the cap.
    pub fn push(&mut self, chunk: &[u8]) -> Result<(), LimitExceeded> {
        if chunk.len() > self.max_bytes - self.buffer.len() {
            return Err(LimitExceeded {
                limit: self.max_bytes,
            });
        }
        self.buffer.extend_from_slice(chunk);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn finish(self) -> Vec<u8> {
        self.buffer
    }
}

/// Drain a chunk stream into memory under a byte cap and a per-chunk idle timeout.
pub async fn accumulate<S, B, E>(
    stream: S,
    max_bytes: usize,
    size_hint: Option<usize>,
    idle_timeout: Duration,
) -> Result<Vec<u8>, AccumulateError<E>>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
{
    let mut stream = std::pin::pin!(stream);
    let mut accumulator = FileAccumulator::new(max_bytes, size_hint);

    loop {
        match tokio::time::timeout(idle_timeout, stream.next()).await {
            Err(_) => return Err(AccumulateError::IdleTimeout(idle_timeout)),
            Ok(None) => break,
            Ok(Some(Err(e))) => return Err(AccumulateError::Stream(e)),
            Ok(Some(Ok(chunk))) => accumulator.push(chunk.as_ref())?,
        }
    }

    Ok(accumulator.finish())
}

/// A part counts as the upload when it carries a filename and, if a field name is
/// configured, is sent under that name.
fn is_file_part(name: Option<&str>, file_name: Option<&str>, wanted: Option<&str>) -> bool {
    if file_name.is_none() {
        return false;
    }
    match wanted {
        Some(wanted) => name == Some(wanted),
        None => true,
    }
}

fn idle_timeout_error(idle: Duration) -> AppError {
    AppError::UploadTimeout(format!(
        "No upload data received for {} seconds",
        idle.as_secs()
    ))
}

fn too_large_error(limit: usize) -> AppError {
    AppError::PayloadTooLarge(format!(
        "File size exceeds maximum allowed size of {} bytes",
        limit
    ))
}

/// Read the first file part of `multipart`.
///
/// Non-file parts before it are skipped. Anything after it is left unread.
pub async fn read_upload(
    mut multipart: Multipart,
    limits: &UploadLimits,
    size_hint: Option<usize>,
) -> Result<UploadedFile, AppError> {
    let idle = limits.idle_timeout();

    loop {
        let next = tokio::time::timeout(idle, multipart.next_field())
            .await
            .map_err(|_| idle_timeout_error(idle))?
            .map_err(multipart_error_to_app_error)?;

        let Some(field) = next else {
            return Err(AppError::MissingFile);
        };

        if !is_file_part(field.name(), field.file_name(), limits.field_name.as_deref()) {
            tracing::debug!(field = ?field.name(), "Skipping multipart field");
            continue;
        }

        let field_name = field.name().map(str::to_string);
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);

        let data = accumulate(field, limits.max_upload_bytes, size_hint, idle)
            .await
            .map_err(|e| match e {
                AccumulateError::TooLarge(LimitExceeded { limit }) => too_large_error(limit),
                AccumulateError::IdleTimeout(idle) => idle_timeout_error(idle),
                AccumulateError::Stream(e) => multipart_error_to_app_error(e),
            })?;

        if data.is_empty() {
            return Err(AppError::EmptyFile);
        }

        tracing::debug!(
            field = ?field_name,
            file_name = ?file_name,
            content_type = ?content_type,
            size = data.len(),
            "Upload received"
        );

        return Ok(UploadedFile {
            field_name,
            file_name,
            content_type,
            data,
        });
    }
}
