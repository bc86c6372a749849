//! Shared application state

use thumbnailer_core::Config;

use crate::services::ThumbnailService;

pub struct AppState {
    pub config: Config,
    pub thumbnails: ThumbnailService,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let thumbnails =
            ThumbnailService::new(&config.thumbnail, config.max_concurrent_transforms);
        Self { config, thumbnails }
    }
}
