use std::sync::Arc;

use thumbnailer_core::{AppError, ThumbnailConfig};
use thumbnailer_processing::{ThumbnailSpec, ThumbnailTransformer, TransformResult};
use tokio::sync::Semaphore;

/// Runs thumbnail transforms on the blocking pool, at most `max_concurrent` at a time.
#[derive(Clone)]
pub struct ThumbnailService {
    spec: ThumbnailSpec,
    permits: Arc<Semaphore>,
}

impl ThumbnailService {
    pub fn new(config: &ThumbnailConfig, max_concurrent: usize) -> Self {
        Self {
            spec: ThumbnailSpec::from(config),
            permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
        }
    }

    pub async fn generate(&self, data: Vec<u8>) -> Result<TransformResult, AppError> {
        let permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| AppError::Internal(format!("transform pool closed: {}", e)))?;

        let spec = self.spec;
        tokio::task::spawn_blocking(move || {
            let _permit = permit;
            ThumbnailTransformer::transform(&data, &spec)
        })
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Thumbnail task failed");
            AppError::Internal(e.to_string())
        })?
        .map_err(AppError::from)
    }
}
