//! Thumbnailer Core Library
//!
//! This crate provides the configuration and error types shared by the
//! processing and API crates.

pub mod config;
pub mod error;

// Re-export commonly used types
pub use config::{Config, LogFormat, ThumbnailConfig, UploadLimits};
pub use error::{AppError, ErrorMetadata, LogLevel};
