//! OpenAPI documentation, served at `/api/openapi.json` and rendered by RapiDoc at `/docs`.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use creative_core::models;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "UAC Creative Manager API",
        version = "0.1.0",
        description = "Upload video creatives, derive letterboxed formats, composite modal thumbnails and publish to YouTube, with Google Drive, Google Ads and Telegram integrations."
    ),
    paths(
        handlers::root::root,
        // Uploads
        handlers::video_upload::upload_video,
        handlers::batch_upload::upload_batch,
        handlers::uploads::list_uploads,
        handlers::uploads::get_upload,
        handlers::uploads::update_upload_status,
        handlers::uploads::update_upload_performance,
        // Modals
        handlers::modals::upload_modal,
        handlers::modals::list_modals,
        handlers::modals::preview_modal,
        handlers::modals::delete_modal,
        // Templates
        handlers::templates::list_templates,
        handlers::templates::create_template,
        handlers::templates::get_template,
        // Integrations
        handlers::integrations::integration_status,
        handlers::integrations::integration_settings,
        handlers::integrations::setup_youtube,
        handlers::integrations::youtube_callback,
        handlers::integrations::test_youtube,
        handlers::integrations::setup_google_drive,
        handlers::integrations::google_drive_callback,
        handlers::integrations::test_google_drive,
        handlers::integrations::setup_google_ads,
        handlers::integrations::test_google_ads,
        handlers::integrations::setup_telegram,
        handlers::integrations::test_telegram,
        handlers::integrations::notify_telegram,
    ),
    components(
        schemas(
            error::ErrorResponse,
            handlers::root::RootResponse,
            models::SuccessResponse,
            models::Upload,
            models::UploadStatus,
            models::ThumbnailType,
            models::UploadListResponse,
            models::UpdateUploadStatusRequest,
            models::Orientation,
            models::FormatUploadResult,
            models::VideoUploadResponse,
            models::BatchItemResult,
            models::BatchUploadResponse,
            models::ModalImageResponse,
            models::ModalListResponse,
            models::ModalUploadResponse,
            models::Template,
            models::TemplateListResponse,
            models::CreateTemplateRequest,
            models::OAuthSetupRequest,
            models::GoogleAdsSetupRequest,
            models::TelegramSetupRequest,
            models::TelegramNotifyRequest,
            models::MessageResponse,
            models::OAuthSetupResponse,
            models::YouTubeTestResponse,
            models::DriveTestResponse,
            models::GoogleAdsTestResponse,
            models::TelegramBotInfo,
            models::TelegramSetupResponse,
            models::TelegramTestResponse,
            models::IntegrationStatus,
            models::IntegrationStatusResponse,
            models::IntegrationSettingsResponse,
        )
    ),
    tags(
        (name = "meta", description = "Service banner"),
        (name = "uploads", description = "Video upload pipeline and upload records"),
        (name = "modals", description = "PNG overlays composited onto thumbnails"),
        (name = "templates", description = "Creative briefs"),
        (name = "integrations", description = "YouTube, Google Drive, Google Ads and Telegram")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_routes() {
        let spec = get_openapi_spec();
        for path in [
            "/upload/video",
            "/upload/batch",
            "/modals/{id}/preview",
            "/uploads/{id}/status",
            "/integrations/telegram/notify",
        ] {
            assert!(spec.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
