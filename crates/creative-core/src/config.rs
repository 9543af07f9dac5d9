//! Configuration module
//!
//! Server, database, storage, media limits and integration client settings, read from the
//! environment (and `.env` through dotenvy). Integration secrets are not configuration: they are
//! entered through the setup endpoints and persisted in `oauth_credentials`.

use std::env;

const SERVER_PORT: u16 = 8000;
const MAX_CONNECTIONS: u32 = 10;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const HTTP_CONCURRENCY_LIMIT: usize = 256;
const DEFAULT_CORS_ORIGINS: &str =
    "http://localhost:3000,http://127.0.0.1:3000,http://localhost:8000,http://127.0.0.1:8000";

/// Base configuration for the HTTP server
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub http_concurrency_limit: usize,
    pub environment: String,
}

/// Creative manager configuration
#[derive(Clone, Debug)]
pub struct CreativeConfig {
    pub base: BaseConfig,
    pub database_url: String,
    // Local storage
    pub upload_dir: String,
    pub public_base_url: String,
    // Media limits
    pub max_video_size_bytes: usize,
    pub video_allowed_extensions: Vec<String>,
    pub video_allowed_content_types: Vec<String>,
    pub max_image_size_bytes: usize,
    pub image_allowed_extensions: Vec<String>,
    pub image_allowed_content_types: Vec<String>,
    pub max_batch_files: usize,
    // External binaries
    pub ffmpeg_path: String,
    pub ffprobe_path: String,
    // Integrations
    pub http_client_timeout_secs: u64,
    pub notify_telegram_on_upload: bool,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<CreativeConfig>);

impl Config {
    fn as_creative(&self) -> &CreativeConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_name(&self.as_creative().base.environment)
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        let config = CreativeConfig::from_lookup(|key| env::var(key).ok())?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.as_creative().validate()
    }

    pub fn server_port(&self) -> u16 {
        self.as_creative().base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.as_creative().base.cors_origins
    }

    pub fn db_max_connections(&self) -> u32 {
        self.as_creative().base.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.as_creative().base.db_timeout_seconds
    }

    pub fn http_concurrency_limit(&self) -> usize {
        self.as_creative().base.http_concurrency_limit
    }

    pub fn environment(&self) -> &str {
        &self.as_creative().base.environment
    }

    pub fn database_url(&self) -> &str {
        &self.as_creative().database_url
    }

    pub fn upload_dir(&self) -> &str {
        &self.as_creative().upload_dir
    }

    pub fn public_base_url(&self) -> &str {
        &self.as_creative().public_base_url
    }

    pub fn max_video_size_bytes(&self) -> usize {
        self.as_creative().max_video_size_bytes
    }

    pub fn video_allowed_extensions(&self) -> &[String] {
        &self.as_creative().video_allowed_extensions
    }

    pub fn video_allowed_content_types(&self) -> &[String] {
        &self.as_creative().video_allowed_content_types
    }

    pub fn max_image_size_bytes(&self) -> usize {
        self.as_creative().max_image_size_bytes
    }

    pub fn image_allowed_extensions(&self) -> &[String] {
        &self.as_creative().image_allowed_extensions
    }

    pub fn image_allowed_content_types(&self) -> &[String] {
        &self.as_creative().image_allowed_content_types
    }

    pub fn max_batch_files(&self) -> usize {
        self.as_creative().max_batch_files
    }

    pub fn ffmpeg_path(&self) -> &str {
        &self.as_creative().ffmpeg_path
    }

    pub fn ffprobe_path(&self) -> &str {
        &self.as_creative().ffprobe_path
    }

    pub fn http_client_timeout_secs(&self) -> u64 {
        self.as_creative().http_client_timeout_secs
    }

    pub fn notify_telegram_on_upload(&self) -> bool {
        self.as_creative().notify_telegram_on_upload
    }

    /// Largest request body the server accepts: a full batch of maximum-size videos.
    pub fn max_request_body_bytes(&self) -> usize {
        let c = self.as_creative();
        c.max_video_size_bytes
            .max(c.max_image_size_bytes)
            .saturating_mul(c.max_batch_files.max(1))
    }
}

fn is_production_name(environment: &str) -> bool {
    let env = environment.to_lowercase();
    env == "production" || env == "prod"
}

fn parse_list(value: String) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

impl CreativeConfig {
    /// Build the configuration from a key lookup. `Config::from_env` passes `std::env::var`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        const MAX_VIDEO_SIZE_MB: usize = 100;
        const MAX_IMAGE_SIZE_MB: usize = 10;
        const MAX_BATCH_FILES: usize = 20;
        const HTTP_CLIENT_TIMEOUT_SECS: u64 = 600;

        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let cors_origins_str =
            lookup("CORS_ORIGINS").unwrap_or_else(|| DEFAULT_CORS_ORIGINS.to_string());
        if is_production_name(&environment) && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let base = BaseConfig {
            server_port: lookup("PORT")
                .unwrap_or_else(|| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            db_max_connections: lookup("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|| MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: lookup("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|| CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            http_concurrency_limit: lookup("HTTP_CONCURRENCY_LIMIT")
                .unwrap_or_else(|| HTTP_CONCURRENCY_LIMIT.to_string())
                .parse()
                .unwrap_or(HTTP_CONCURRENCY_LIMIT),
            environment,
        };

        let max_video_size_mb = lookup("MAX_VIDEO_SIZE_MB")
            .unwrap_or_else(|| MAX_VIDEO_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_VIDEO_SIZE_MB);

        let max_image_size_mb = lookup("MAX_IMAGE_SIZE_MB")
            .unwrap_or_else(|| MAX_IMAGE_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_IMAGE_SIZE_MB);

        Ok(CreativeConfig {
            base,
            database_url: lookup("DATABASE_URL")
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set"))?,
            upload_dir: lookup("UPLOAD_DIR").unwrap_or_else(|| "uploads".to_string()),
            public_base_url: lookup("PUBLIC_BASE_URL")
                .unwrap_or_else(|| "http://localhost:8000/files".to_string()),
            max_video_size_bytes: max_video_size_mb * 1024 * 1024,
            video_allowed_extensions: parse_list(
                lookup("VIDEO_ALLOWED_EXTENSIONS")
                    .unwrap_or_else(|| "mp4,avi,mov,mkv,webm".to_string()),
            ),
            video_allowed_content_types: parse_list(
                lookup("VIDEO_ALLOWED_CONTENT_TYPES").unwrap_or_else(|| {
                    "video/mp4,video/avi,video/mov,video/mkv,video/webm,video/quicktime,video/x-msvideo,video/x-matroska"
                        .to_string()
                }),
            ),
            max_image_size_bytes: max_image_size_mb * 1024 * 1024,
            image_allowed_extensions: parse_list(
                lookup("IMAGE_ALLOWED_EXTENSIONS")
                    .unwrap_or_else(|| "jpg,jpeg,png,gif,webp".to_string()),
            ),
            image_allowed_content_types: parse_list(
                lookup("IMAGE_ALLOWED_CONTENT_TYPES")
                    .unwrap_or_else(|| "image/jpeg,image/png,image/gif,image/webp".to_string()),
            ),
            max_batch_files: lookup("MAX_BATCH_FILES")
                .unwrap_or_else(|| MAX_BATCH_FILES.to_string())
                .parse()
                .unwrap_or(MAX_BATCH_FILES),
            ffmpeg_path: lookup("FFMPEG_PATH").unwrap_or_else(|| "ffmpeg".to_string()),
            ffprobe_path: lookup("FFPROBE_PATH").unwrap_or_else(|| "ffprobe".to_string()),
            http_client_timeout_secs: lookup("HTTP_CLIENT_TIMEOUT_SECS")
                .unwrap_or_else(|| HTTP_CLIENT_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(HTTP_CLIENT_TIMEOUT_SECS),
            notify_telegram_on_upload: lookup("NOTIFY_TELEGRAM_ON_UPLOAD")
                .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
                .unwrap_or(true),
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !(self.database_url.starts_with("postgres://")
            || self.database_url.starts_with("postgresql://"))
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        if self.upload_dir.trim().is_empty() {
            return Err(anyhow::anyhow!("UPLOAD_DIR must not be empty"));
        }

        if self.max_video_size_bytes == 0 || self.max_image_size_bytes == 0 {
            return Err(anyhow::anyhow!(
                "MAX_VIDEO_SIZE_MB and MAX_IMAGE_SIZE_MB must be greater than zero"
            ));
        }

        if self.max_batch_files == 0 {
            return Err(anyhow::anyhow!("MAX_BATCH_FILES must be greater than zero"));
        }

        if self.base.http_concurrency_limit == 0 {
            return Err(anyhow::anyhow!(
                "HTTP_CONCURRENCY_LIMIT must be greater than zero"
            ));
        }

        Ok(())
    }
}
