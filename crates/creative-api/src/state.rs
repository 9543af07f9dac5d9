//! Application state and sub-state extractors.
//!
//! AppState is split into domain sub-states so handlers can extract only what they need
//! via Axum's `FromRef`.

use creative_core::Config;
use creative_db::{
    LogRepository, ModalImageRepository, OAuthCredentialRepository, RoleRepository,
    TemplateRepository, UploadRepository,
};
use creative_integrations::IntegrationManager;
use creative_processing::{FFmpegService, MediaValidator, ThumbnailProcessor, VideoProbe};
use creative_storage::Storage;
use sqlx::PgPool;
use std::sync::Arc;

/// Database pool and every repository
#[derive(Clone)]
pub struct DbState {
    pub pool: PgPool,
    pub modal_repository: ModalImageRepository,
    pub template_repository: TemplateRepository,
    pub upload_repository: UploadRepository,
    pub credential_repository: OAuthCredentialRepository,
    pub log_repository: LogRepository,
    pub role_repository: RoleRepository,
}

/// Storage, upload validators and the ffmpeg/ffprobe wrappers
#[derive(Clone)]
pub struct MediaState {
    pub storage: Arc<dyn Storage>,
    pub video_validator: MediaValidator,
    pub image_validator: MediaValidator,
    pub max_batch_files: usize,
    pub ffmpeg: FFmpegService,
    pub probe: VideoProbe,
    pub thumbnails: ThumbnailProcessor,
}

/// Third-party integrations
#[derive(Clone)]
pub struct IntegrationState {
    pub manager: Arc<IntegrationManager>,
    /// Send a Telegram message after each successful upload
    pub notify_on_upload: bool,
}

pub struct AppState {
    pub db: DbState,
    pub media: MediaState,
    pub integrations: IntegrationState,
    pub config: Config,
}

impl axum::extract::FromRef<Arc<AppState>> for DbState {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.db.clone()
    }
}

impl axum::extract::FromRef<Arc<AppState>> for MediaState {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.media.clone()
    }
}

impl axum::extract::FromRef<Arc<AppState>> for IntegrationState {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.integrations.clone()
    }
}

fn _assert_app_state_send_sync() {
    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}
    assert_send::<AppState>();
    assert_sync::<AppState>();
}
