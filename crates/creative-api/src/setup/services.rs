//! Service initialization and application state setup

use crate::state::{AppState, DbState, IntegrationState, MediaState};
use anyhow::{Context, Result};
use creative_core::Config;
use creative_db::{
    LogRepository, ModalImageRepository, OAuthCredentialRepository, RoleRepository,
    TemplateRepository, UploadRepository,
};
use creative_integrations::{IntegrationEndpoints, IntegrationManager};
use creative_processing::{FFmpegService, MediaValidator, ThumbnailProcessor, VideoProbe};
use creative_storage::Storage;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

/// Initialize all services and repositories, returning the application state.
///
/// `endpoints` selects the third-party API hosts; production passes the defaults.
pub async fn initialize_services(
    config: &Config,
    pool: PgPool,
    storage: Arc<dyn Storage>,
    endpoints: IntegrationEndpoints,
) -> Result<Arc<AppState>> {
    let db = DbState {
        modal_repository: ModalImageRepository::new(pool.clone()),
        template_repository: TemplateRepository::new(pool.clone()),
        upload_repository: UploadRepository::new(pool.clone()),
        credential_repository: OAuthCredentialRepository::new(pool.clone()),
        log_repository: LogRepository::new(pool.clone()),
        role_repository: RoleRepository::new(pool.clone()),
        pool,
    };

    let ffmpeg =
        FFmpegService::new(config.ffmpeg_path().to_string()).context("Failed to set up ffmpeg")?;
    let probe =
        VideoProbe::new(config.ffprobe_path().to_string()).context("Failed to set up ffprobe")?;
    if let Err(e) = ffmpeg.check_available().await {
        tracing::warn!(
            ffmpeg_path = %config.ffmpeg_path(),
            error = %e,
            "ffmpeg is not available; uploads fall back to unprocessed copies"
        );
    }

    let media = MediaState {
        storage,
        video_validator: MediaValidator::new(
            config.max_video_size_bytes(),
            config.video_allowed_extensions().to_vec(),
            config.video_allowed_content_types().to_vec(),
        ),
        image_validator: MediaValidator::new(
            config.max_image_size_bytes(),
            config.image_allowed_extensions().to_vec(),
            config.image_allowed_content_types().to_vec(),
        ),
        max_batch_files: config.max_batch_files(),
        thumbnails: ThumbnailProcessor::new(ffmpeg.clone()),
        ffmpeg,
        probe,
    };

    let manager = IntegrationManager::new(
        Arc::new(db.credential_repository.clone()),
        Arc::new(db.log_repository.clone()),
        endpoints,
        Duration::from_secs(config.http_client_timeout_secs()),
    )?;
    tracing::info!(
        google_api = %manager.endpoints().google_api_base,
        telegram_api = %manager.endpoints().telegram_api_base,
        "Integration manager initialized"
    );

    let integrations = IntegrationState {
        manager: Arc::new(manager),
        notify_on_upload: config.notify_telegram_on_upload(),
    };

    Ok(Arc::new(AppState {
        db,
        media,
        integrations,
        config: config.clone(),
    }))
}
