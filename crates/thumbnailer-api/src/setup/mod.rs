//! Application setup and initialization

pub mod routes;
pub mod server;

use std::sync::Arc;

use anyhow::{Context, Result};
use thumbnailer_core::Config;

use crate::state::AppState;

/// Build the router from a validated configuration
pub fn build_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    config
        .validate()
        .context("Configuration validation failed")?;

    let state = Arc::new(AppState::new(config));
    let router = routes::setup_routes(&state.config, state.clone())?;

    Ok((state, router))
}

/// Initialize the entire application
pub fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    crate::telemetry::init_telemetry(config.log_format)
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    let (state, router) = build_app(config)?;
    tracing::info!("Configuration loaded and validated successfully");

    Ok((state, router))
}
