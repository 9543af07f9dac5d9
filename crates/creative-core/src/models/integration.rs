//! Request and response DTOs of the `/integrations` endpoints.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// OAuth client registration for YouTube and Google Drive
#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct OAuthSetupRequest {
    #[validate(length(min = 1, message = "client_id is required"))]
    pub client_id: String,
    #[validate(length(min = 1, message = "client_secret is required"))]
    pub client_secret: String,
    #[validate(url(message = "redirect_uri must be a valid URL"))]
    pub redirect_uri: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct GoogleAdsSetupRequest {
    #[validate(length(min = 1, message = "client_id is required"))]
    pub client_id: String,
    #[validate(length(min = 1, message = "client_secret is required"))]
    pub client_secret: String,
    #[validate(length(min = 1, message = "refresh_token is required"))]
    pub refresh_token: String,
    #[validate(length(min = 1, message = "developer_token is required"))]
    pub developer_token: String,
    #[validate(length(min = 1, message = "customer_id is required"))]
    pub customer_id: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct TelegramSetupRequest {
    #[validate(length(min = 1, message = "bot_token is required"))]
    pub bot_token: String,
    #[validate(length(min = 1, message = "chat_id is required"))]
    pub chat_id: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct TelegramNotifyRequest {
    #[validate(length(min = 1, max = 4096, message = "message must be 1 to 4096 characters"))]
    pub message: String,
    pub parse_mode: Option<String>,
}

/// Query string the OAuth provider redirects back with
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct OAuthCallbackQuery {
    pub code: String,
    pub state: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OAuthSetupResponse {
    pub success: bool,
    pub message: String,
    pub auth_url: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct YouTubeTestResponse {
    pub success: bool,
    pub message: String,
    #[schema(value_type = Object)]
    pub channel_info: serde_json::Value,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DriveTestResponse {
    pub success: bool,
    pub message: String,
    #[schema(value_type = Object)]
    pub user_info: serde_json::Value,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GoogleAdsTestResponse {
    pub success: bool,
    pub message: String,
    pub customer_id: String,
    pub mode: String,
}

/// Identity returned by Telegram `getMe`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TelegramBotInfo {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TelegramSetupResponse {
    pub success: bool,
    pub message: String,
    pub bot_info: TelegramBotInfo,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TelegramTestResponse {
    pub success: bool,
    pub message: String,
    pub bot_info: TelegramBotInfo,
    /// `None` when no chat id is stored
    pub message_sent: Option<bool>,
}

/// Per-service configuration state
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
pub struct IntegrationStatus {
    pub configured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorized: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct IntegrationStatusResponse {
    pub success: bool,
    pub integrations: BTreeMap<String, IntegrationStatus>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct IntegrationSettingsResponse {
    pub success: bool,
    #[schema(value_type = Object)]
    pub settings: serde_json::Map<String, serde_json::Value>,
}
