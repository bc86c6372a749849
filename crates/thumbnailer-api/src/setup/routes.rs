//! Route configuration and setup

use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, routing::post, Router};
use thumbnailer_core::Config;
use tower::limit::GlobalConcurrencyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{fallback::index, upload::upload_thumbnail};
use crate::middleware::{cors_middleware, request_id_middleware};
use crate::state::AppState;

/// Room for multipart framing and small text fields on top of the file cap
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let body_limit = config
        .upload
        .max_upload_bytes
        .checked_add(MULTIPART_OVERHEAD_BYTES)
        .ok_or_else(|| anyhow::anyhow!("MAX_UPLOAD_SIZE_MB is too large"))?;

    let http_concurrency_limit = config.http_concurrency_limit.max(1);
    tracing::info!(
        http_concurrency_limit,
        body_limit,
        "HTTP limits configured"
    );

    let app = Router::new()
        .route("/upload", post(upload_thumbnail).fallback(index))
        .fallback(index)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(GlobalConcurrencyLimitLayer::new(http_concurrency_limit))
        .layer(axum::middleware::from_fn(cors_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .with_state(state);

    Ok(app)
}
