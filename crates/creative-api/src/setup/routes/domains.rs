//! Domain route groups (uploads, modals, templates, integrations).

use crate::handlers;
use crate::state::AppState;
use axum::routing::{delete, get, post, put};
use axum::Router;
use std::sync::Arc;

pub fn upload_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/upload/video", post(handlers::video_upload::upload_video))
        .route("/upload/batch", post(handlers::batch_upload::upload_batch))
        .route("/uploads", get(handlers::uploads::list_uploads))
        .route("/uploads/{id}", get(handlers::uploads::get_upload))
        .route(
            "/uploads/{id}/status",
            put(handlers::uploads::update_upload_status),
        )
        .route(
            "/uploads/{id}/performance",
            put(handlers::uploads::update_upload_performance),
        )
        .with_state(state)
}

pub fn modal_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/upload/modal", post(handlers::modals::upload_modal))
        .route("/modals", get(handlers::modals::list_modals))
        .route("/modals/{id}", delete(handlers::modals::delete_modal))
        .route("/modals/{id}/preview", get(handlers::modals::preview_modal))
        .with_state(state)
}

pub fn template_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/templates",
            get(handlers::templates::list_templates).post(handlers::templates::create_template),
        )
        .route("/templates/{id}", get(handlers::templates::get_template))
        .with_state(state)
}

pub fn integration_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use handlers::integrations as h;

    Router::new()
        .route("/integrations/status", get(h::integration_status))
        .route("/integrations/settings", get(h::integration_settings))
        .route("/integrations/youtube/setup", post(h::setup_youtube))
        .route("/integrations/youtube/callback", get(h::youtube_callback))
        .route("/integrations/youtube/test", post(h::test_youtube))
        .route("/integrations/google_drive/setup", post(h::setup_google_drive))
        .route(
            "/integrations/google_drive/callback",
            get(h::google_drive_callback),
        )
        .route("/integrations/google_drive/test", post(h::test_google_drive))
        .route("/integrations/google_ads/setup", post(h::setup_google_ads))
        .route("/integrations/google_ads/test", post(h::test_google_ads))
        .route("/integrations/telegram/setup", post(h::setup_telegram))
        .route("/integrations/telegram/test", post(h::test_telegram))
        .route("/integrations/telegram/notify", post(h::notify_telegram))
        .with_state(state)
}
