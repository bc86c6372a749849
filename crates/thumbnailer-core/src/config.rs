//! Configuration module
//!
//! Process-wide settings are read once at startup from the environment (and an
//! optional `.env` file), validated, and then passed explicitly to the server
//! setup code.

use std::env;
use std::time::Duration;

// Common constants
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const THUMBNAIL_WIDTH: u32 = 200;
const THUMBNAIL_HEIGHT: u32 = 200;
const JPEG_QUALITY: u8 = 80;
const MAX_UPLOAD_SIZE_MB: usize = 10;
const MAX_SOURCE_DIMENSION: u32 = 16_384;
const UPLOAD_TIMEOUT_SECS: u64 = 30;
const UPLOAD_IDLE_TIMEOUT_SECS: u64 = 10;
const HTTP_CONCURRENCY_LIMIT: usize = 1024;

/// Largest thumbnail edge accepted by `validate`.
pub const MAX_THUMBNAIL_DIMENSION: u32 = 4096;

/// Console log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl LogFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "compact" | "text" => Some(LogFormat::Compact),
            "json" => Some(LogFormat::Json),
            _ => None,
        }
    }
}

/// Thumbnail output settings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ThumbnailConfig {
    pub width: u32,
    pub height: u32,
    /// JPEG quality (1-100)
    pub quality: u8,
    /// Decoder limit on source width and height
    pub max_source_dimension: u32,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            width: THUMBNAIL_WIDTH,
            height: THUMBNAIL_HEIGHT,
            quality: JPEG_QUALITY,
            max_source_dimension: MAX_SOURCE_DIMENSION,
        }
    }
}

/// Limits applied while reading an upload body
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadLimits {
    pub max_upload_bytes: usize,
    pub timeout_secs: u64,
    pub idle_timeout_secs: u64,
    /// When set, only a file part with this field name is accepted.
    pub field_name: Option<String>,
}

impl UploadLimits {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_upload_bytes: MAX_UPLOAD_SIZE_MB * 1024 * 1024,
            timeout_secs: UPLOAD_TIMEOUT_SECS,
            idle_timeout_secs: UPLOAD_IDLE_TIMEOUT_SECS,
            field_name: None,
        }
    }
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub log_format: LogFormat,
    pub thumbnail: ThumbnailConfig,
    pub upload: UploadLimits,
    pub max_concurrent_transforms: usize,
    pub http_concurrency_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            environment: "development".to_string(),
            log_format: LogFormat::default(),
            thumbnail: ThumbnailConfig::default(),
            upload: UploadLimits::default(),
            max_concurrent_transforms: default_transform_permits(),
            http_concurrency_limit: HTTP_CONCURRENCY_LIMIT,
        }
    }
}

fn default_transform_permits() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

fn parse_or<T: std::str::FromStr>(value: Option<String>, default: T) -> T {
    value
        .and_then(|s| s.trim().parse::<T>().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from the process environment, reading `.env` first.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Unparseable numeric values fall back to their defaults, except `PORT`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            None => defaults.port,
        };

        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or(defaults.environment);

        let log_format = lookup("LOG_FORMAT")
            .and_then(|s| LogFormat::parse(&s))
            .unwrap_or_default();

        let thumbnail = ThumbnailConfig {
            width: parse_or(lookup("THUMBNAIL_WIDTH"), THUMBNAIL_WIDTH),
            height: parse_or(lookup("THUMBNAIL_HEIGHT"), THUMBNAIL_HEIGHT),
            quality: parse_or(lookup("JPEG_QUALITY"), JPEG_QUALITY),
            max_source_dimension: parse_or(lookup("MAX_SOURCE_DIMENSION"), MAX_SOURCE_DIMENSION),
        };

        let max_upload_mb: usize = parse_or(lookup("MAX_UPLOAD_SIZE_MB"), MAX_UPLOAD_SIZE_MB);
        let max_upload_bytes = max_upload_mb
            .checked_mul(1024 * 1024)
            .ok_or_else(|| anyhow::anyhow!("MAX_UPLOAD_SIZE_MB is too large"))?;
        let upload = UploadLimits {
            max_upload_bytes,
            timeout_secs: parse_or(lookup("UPLOAD_TIMEOUT_SECS"), UPLOAD_TIMEOUT_SECS),
            idle_timeout_secs: parse_or(lookup("UPLOAD_IDLE_TIMEOUT_SECS"), UPLOAD_IDLE_TIMEOUT_SECS),
            field_name: lookup("UPLOAD_FIELD_NAME")
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        };

        Ok(Config {
            host: lookup("HOST").unwrap_or(defaults.host),
            port,
            environment,
            log_format,
            thumbnail,
            upload,
            max_concurrent_transforms: parse_or(
                lookup("MAX_CONCURRENT_TRANSFORMS"),
                defaults.max_concurrent_transforms,
            ),
            http_concurrency_limit: parse_or(
                lookup("HTTP_CONCURRENCY_LIMIT"),
                HTTP_CONCURRENCY_LIMIT,
            ),
        })
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    /// Socket address string the server binds to
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        let thumb = &self.thumbnail;
        if thumb.width == 0 || thumb.width > MAX_THUMBNAIL_DIMENSION {
            return Err(anyhow::anyhow!(
                "THUMBNAIL_WIDTH must be between 1 and {}",
                MAX_THUMBNAIL_DIMENSION
            ));
        }
        if thumb.height == 0 || thumb.height > MAX_THUMBNAIL_DIMENSION {
            return Err(anyhow::anyhow!(
                "THUMBNAIL_HEIGHT must be between 1 and {}",
                MAX_THUMBNAIL_DIMENSION
            ));
        }
        if !(1..=100).contains(&thumb.quality) {
            return Err(anyhow::anyhow!("JPEG_QUALITY must be between 1 and 100"));
        }
        if thumb.max_source_dimension == 0 {
            return Err(anyhow::anyhow!("MAX_SOURCE_DIMENSION cannot be 0"));
        }
        if self.upload.max_upload_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE_MB cannot be 0"));
        }
        if self.upload.timeout_secs == 0 || self.upload.idle_timeout_secs == 0 {
            return Err(anyhow::anyhow!("Upload timeouts cannot be 0"));
        }
        if self.upload.idle_timeout_secs > self.upload.timeout_secs {
            return Err(anyhow::anyhow!(
                "UPLOAD_IDLE_TIMEOUT_SECS cannot exceed UPLOAD_TIMEOUT_SECS"
            ));
        }
        if self.max_concurrent_transforms == 0 {
            return Err(anyhow::anyhow!("MAX_CONCURRENT_TRANSFORMS cannot be 0"));
        }
        if self.http_concurrency_limit == 0 {
            return Err(anyhow::anyhow!("HTTP_CONCURRENCY_LIMIT cannot be 0"));
        }
        Ok(())
    }
}
