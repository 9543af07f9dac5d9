//! `/integrations/*`: credential setup, OAuth callbacks, connection tests and notifications.
//!
//! The manager writes its own `<service>_<action>` audit rows, so these handlers do not.

use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::IntegrationState;
use axum::{
    extract::{Query, State},
    Json,
};
use creative_core::models::{
    DriveTestResponse, GoogleAdsSetupRequest, GoogleAdsTestResponse, IntegrationSettingsResponse,
    IntegrationStatusResponse, MessageResponse, OAuthCallbackQuery, OAuthSetupRequest,
    OAuthSetupResponse, TelegramNotifyRequest, TelegramSetupRequest, TelegramSetupResponse,
    TelegramTestResponse, YouTubeTestResponse,
};
use creative_integrations::ads::CREDENTIALS_ONLY_MODE;

fn message(text: &str) -> Json<MessageResponse> {
    Json(MessageResponse {
        success: true,
        message: text.to_string(),
    })
}

#[utoipa::path(
    get,
    path = "/integrations/status",
    tag = "integrations",
    responses(
        (status = 200, description = "Configured/authorized state per service", body = IntegrationStatusResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn integration_status(
    State(integrations): State<IntegrationState>,
) -> Result<Json<IntegrationStatusResponse>, HttpAppError> {
    let integrations = integrations.manager.status().await?;
    Ok(Json(IntegrationStatusResponse {
        success: true,
        integrations,
    }))
}

#[utoipa::path(
    get,
    path = "/integrations/settings",
    tag = "integrations",
    responses(
        (status = 200, description = "Non-secret settings per service", body = IntegrationSettingsResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn integration_settings(
    State(integrations): State<IntegrationState>,
) -> Result<Json<IntegrationSettingsResponse>, HttpAppError> {
    let settings = integrations.manager.settings().await?;
    Ok(Json(IntegrationSettingsResponse {
        success: true,
        settings,
    }))
}

// YouTube

#[utoipa::path(
    post,
    path = "/integrations/youtube/setup",
    tag = "integrations",
    request_body = OAuthSetupRequest,
    responses(
        (status = 200, description = "Client stored; open auth_url to authorize", body = OAuthSetupResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all, fields(service = "youtube", operation = "setup"))]
pub async fn setup_youtube(
    State(integrations): State<IntegrationState>,
    ValidatedJson(request): ValidatedJson<OAuthSetupRequest>,
) -> Result<Json<OAuthSetupResponse>, HttpAppError> {
    let auth_url = integrations.manager.setup_youtube(&request).await?;
    Ok(Json(OAuthSetupResponse {
        success: true,
        message: "YouTube credentials saved. Visit auth_url to authorize access.".to_string(),
        auth_url,
    }))
}

#[utoipa::path(
    get,
    path = "/integrations/youtube/callback",
    tag = "integrations",
    params(OAuthCallbackQuery),
    responses(
        (status = 200, description = "Authorization code exchanged", body = MessageResponse),
        (status = 400, description = "YouTube is not configured", body = ErrorResponse),
        (status = 502, description = "Token exchange failed", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all, fields(service = "youtube", operation = "callback"))]
pub async fn youtube_callback(
    State(integrations): State<IntegrationState>,
    Query(query): Query<OAuthCallbackQuery>,
) -> Result<Json<MessageResponse>, HttpAppError> {
    integrations.manager.youtube_callback(&query.code).await?;
    Ok(message("YouTube authorization completed successfully"))
}

#[utoipa::path(
    post,
    path = "/integrations/youtube/test",
    tag = "integrations",
    responses(
        (status = 200, description = "Connection works", body = YouTubeTestResponse),
        (status = 400, description = "YouTube is not configured", body = ErrorResponse),
        (status = 401, description = "YouTube is not authorized", body = ErrorResponse),
        (status = 502, description = "YouTube API error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all, fields(service = "youtube", operation = "test"))]
pub async fn test_youtube(
    State(integrations): State<IntegrationState>,
) -> Result<Json<YouTubeTestResponse>, HttpAppError> {
    let channel_info = integrations.manager.test_youtube().await?;
    Ok(Json(YouTubeTestResponse {
        success: true,
        message: "YouTube connection successful".to_string(),
        channel_info,
    }))
}

// Google Drive

#[utoipa::path(
    post,
    path = "/integrations/google_drive/setup",
    tag = "integrations",
    request_body = OAuthSetupRequest,
    responses(
        (status = 200, description = "Client stored; open auth_url to authorize", body = OAuthSetupResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all, fields(service = "google_drive", operation = "setup"))]
pub async fn setup_google_drive(
    State(integrations): State<IntegrationState>,
    ValidatedJson(request): ValidatedJson<OAuthSetupRequest>,
) -> Result<Json<OAuthSetupResponse>, HttpAppError> {
    let auth_url = integrations.manager.setup_google_drive(&request).await?;
    Ok(Json(OAuthSetupResponse {
        success: true,
        message: "Google Drive credentials saved. Visit auth_url to authorize access."
            .to_string(),
        auth_url,
    }))
}

#[utoipa::path(
    get,
    path = "/integrations/google_drive/callback",
    tag = "integrations",
    params(OAuthCallbackQuery),
    responses(
        (status = 200, description = "Authorization code exchanged", body = MessageResponse),
        (status = 400, description = "Google Drive is not configured", body = ErrorResponse),
        (status = 502, description = "Token exchange failed", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all, fields(service = "google_drive", operation = "callback"))]
pub async fn google_drive_callback(
    State(integrations): State<IntegrationState>,
    Query(query): Query<OAuthCallbackQuery>,
) -> Result<Json<MessageResponse>, HttpAppError> {
    integrations.manager.google_drive_callback(&query.code).await?;
    Ok(message("Google Drive authorization completed successfully"))
}

#[utoipa::path(
    post,
    path = "/integrations/google_drive/test",
    tag = "integrations",
    responses(
        (status = 200, description = "Connection works", body = DriveTestResponse),
        (status = 400, description = "Google Drive is not configured", body = ErrorResponse),
        (status = 401, description = "Google Drive is not authorized", body = ErrorResponse),
        (status = 502, description = "Drive API error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all, fields(service = "google_drive", operation = "test"))]
pub async fn test_google_drive(
    State(integrations): State<IntegrationState>,
) -> Result<Json<DriveTestResponse>, HttpAppError> {
    let user_info = integrations.manager.test_google_drive().await?;
    Ok(Json(DriveTestResponse {
        success: true,
        message: "Google Drive connection successful".to_string(),
        user_info,
    }))
}

// Google Ads

#[utoipa::path(
    post,
    path = "/integrations/google_ads/setup",
    tag = "integrations",
    request_body = GoogleAdsSetupRequest,
    responses(
        (status = 200, description = "Credentials stored", body = MessageResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all, fields(service = "google_ads", operation = "setup"))]
pub async fn setup_google_ads(
    State(integrations): State<IntegrationState>,
    ValidatedJson(request): ValidatedJson<GoogleAdsSetupRequest>,
) -> Result<Json<MessageResponse>, HttpAppError> {
    integrations.manager.setup_google_ads(&request).await?;
    Ok(message("Google Ads credentials saved successfully"))
}

#[utoipa::path(
    post,
    path = "/integrations/google_ads/test",
    tag = "integrations",
    responses(
        (status = 200, description = "Credentials verified", body = GoogleAdsTestResponse),
        (status = 400, description = "Google Ads is not configured", body = ErrorResponse),
        (status = 502, description = "Token refresh failed", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all, fields(service = "google_ads", operation = "test"))]
pub async fn test_google_ads(
    State(integrations): State<IntegrationState>,
) -> Result<Json<GoogleAdsTestResponse>, HttpAppError> {
    let customer_id = integrations.manager.test_google_ads().await?;
    Ok(Json(GoogleAdsTestResponse {
        success: true,
        message: "Google Ads credentials verified".to_string(),
        customer_id,
        mode: CREDENTIALS_ONLY_MODE.to_string(),
    }))
}

// Telegram

#[utoipa::path(
    post,
    path = "/integrations/telegram/setup",
    tag = "integrations",
    request_body = TelegramSetupRequest,
    responses(
        (status = 200, description = "Bot token verified and stored", body = TelegramSetupResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 502, description = "Telegram rejected the token", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all, fields(service = "telegram", operation = "setup"))]
pub async fn setup_telegram(
    State(integrations): State<IntegrationState>,
    ValidatedJson(request): ValidatedJson<TelegramSetupRequest>,
) -> Result<Json<TelegramSetupResponse>, HttpAppError> {
    let bot_info = integrations.manager.setup_telegram(&request).await?;
    Ok(Json(TelegramSetupResponse {
        success: true,
        message: "Telegram bot configured successfully".to_string(),
        bot_info,
    }))
}

#[utoipa::path(
    post,
    path = "/integrations/telegram/test",
    tag = "integrations",
    responses(
        (status = 200, description = "Bot reachable; message_sent reports the test message", body = TelegramTestResponse),
        (status = 400, description = "Telegram is not configured", body = ErrorResponse),
        (status = 502, description = "Telegram API error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all, fields(service = "telegram", operation = "test"))]
pub async fn test_telegram(
    State(integrations): State<IntegrationState>,
) -> Result<Json<TelegramTestResponse>, HttpAppError> {
    let outcome = integrations.manager.test_telegram().await?;
    Ok(Json(TelegramTestResponse {
        success: true,
        message: "Telegram connection successful".to_string(),
        bot_info: outcome.bot_info,
        message_sent: outcome.message_sent,
    }))
}

#[utoipa::path(
    post,
    path = "/integrations/telegram/notify",
    tag = "integrations",
    request_body = TelegramNotifyRequest,
    responses(
        (status = 200, description = "Message sent", body = MessageResponse),
        (status = 400, description = "Telegram is not configured or message invalid", body = ErrorResponse),
        (status = 502, description = "Telegram API error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all, fields(service = "telegram", operation = "notify"))]
pub async fn notify_telegram(
    State(integrations): State<IntegrationState>,
    ValidatedJson(request): ValidatedJson<TelegramNotifyRequest>,
) -> Result<Json<MessageResponse>, HttpAppError> {
    integrations.manager.notify_telegram(&request).await?;
    Ok(message("Notification sent successfully"))
}
