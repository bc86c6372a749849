//! Thumbnailer HTTP API
//!
//! Accepts a single image as `multipart/form-data` on `POST /upload` and answers
//! with a JPEG thumbnail embedded as a base64 data URL.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod services;
pub mod setup;
pub mod state;
pub mod telemetry;
pub mod utils;

pub use error::HttpAppError;
pub use response::UploadResponse;
pub use state::AppState;
