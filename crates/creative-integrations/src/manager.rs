//! IntegrationManager - credential lifecycle and audited calls to every external service.
//!
//! Each operation writes a `logs` row: `<service>_<action>` on success and
//! `<service>_<action>_error` with the error text on failure.

use crate::ads::{GoogleAdsCredentials, CREDENTIALS_ONLY_MODE};
use crate::client::{build_http_client, ClientError};
use crate::drive::{DriveClient, DriveFile};
use crate::endpoints::IntegrationEndpoints;
use crate::oauth::{
    build_auth_url, GoogleOAuthCredentials, OAuthClient, ADS_SCOPES, DRIVE_SCOPES, YOUTUBE_SCOPES,
};
use crate::telegram::{TelegramClient, TelegramCredentials, DEFAULT_PARSE_MODE};
use crate::youtube::{watch_url, YouTubeClient};
use chrono::{Duration as ChronoDuration, Utc};
use creative_core::models::{
    GoogleAdsSetupRequest, IntegrationService, IntegrationStatus, OAuthSetupRequest,
    TelegramBotInfo, TelegramNotifyRequest, TelegramSetupRequest,
};
use creative_core::AppError;
use creative_db::{ActivityLog, CredentialStore};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use validator::Validate;

use IntegrationService::{GoogleAds, GoogleDrive, Telegram, YouTube};

/// A video published on YouTube
#[derive(Debug, Clone, PartialEq)]
pub struct YouTubeUpload {
    pub video_id: String,
    pub url: String,
    pub thumbnail_set: bool,
}

/// A Drive file saved to local disk
#[derive(Debug, Clone)]
pub struct DriveDownload {
    pub file: DriveFile,
    pub path: PathBuf,
    pub size_bytes: u64,
}

#[derive(Debug, Clone)]
pub struct TelegramTestOutcome {
    pub bot_info: TelegramBotInfo,
    /// `None` when no chat id is stored
    pub message_sent: Option<bool>,
}

/// Upstream failure. Rejected credentials become [`AppError::InvalidOAuthToken`].
fn upstream_error(service: IntegrationService, err: ClientError) -> AppError {
    if err.is_auth_rejection() {
        AppError::InvalidOAuthToken(format!(
            "{} rejected the stored credentials: {}",
            service.display_name(),
            err
        ))
    } else {
        AppError::integration(service.display_name(), err.to_string())
    }
}

/// Token endpoint failure. A 400 there means a bad code or revoked refresh token.
fn token_error(service: IntegrationService, err: ClientError) -> AppError {
    match err.status() {
        Some(400) | Some(401) | Some(403) => AppError::InvalidOAuthToken(format!(
            "{} token request was rejected: {}",
            service.display_name(),
            err
        )),
        _ => AppError::integration(service.display_name(), err.to_string()),
    }
}

fn too_large(size: u64, max: u64) -> AppError {
    AppError::PayloadTooLarge(format!("{} bytes exceeds max {} bytes", size, max))
}

fn not_configured(service: IntegrationService) -> AppError {
    AppError::IntegrationNotConfigured(format!("{} is not configured", service.display_name()))
}

fn not_authorized(service: IntegrationService) -> AppError {
    AppError::Unauthorized(format!(
        "{} is not authorized. Complete the OAuth flow first",
        service.display_name()
    ))
}

/// File name for a Drive download: last path component of the Drive name with anything
/// outside `[A-Za-z0-9._-]` replaced by `_`, or `<file_id>.mp4`
fn local_file_name(file: &DriveFile, file_id: &str) -> String {
    let name = Path::new(&file.name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    let mut sanitized = String::with_capacity(name.len());
    for c in name.chars().take(255) {
        let c = if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
            c
        } else {
            '_'
        };
        if c == '.' && sanitized.ends_with('.') {
            continue;
        }
        sanitized.push(c);
    }
    let sanitized = sanitized.trim_start_matches('.');

    if !sanitized.chars().any(|c| c.is_ascii_alphanumeric()) || !sanitized.contains('.') {
        format!("{}.mp4", file_id)
    } else {
        sanitized.to_string()
    }
}

pub struct IntegrationManager {
    credentials: Arc<dyn CredentialStore>,
    activity: Arc<dyn ActivityLog>,
    endpoints: IntegrationEndpoints,
    oauth: OAuthClient,
    youtube: YouTubeClient,
    drive: DriveClient,
    telegram: TelegramClient,
}

impl IntegrationManager {
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        activity: Arc<dyn ActivityLog>,
        endpoints: IntegrationEndpoints,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let http = build_http_client(timeout)?;
        Ok(Self {
            credentials,
            activity,
            oauth: OAuthClient::new(http.clone(), endpoints.oauth_token_url.clone()),
            youtube: YouTubeClient::new(
                http.clone(),
                endpoints.google_api_base.clone(),
                endpoints.google_upload_base.clone(),
            ),
            drive: DriveClient::new(http.clone(), endpoints.google_api_base.clone()),
            telegram: TelegramClient::new(http, endpoints.telegram_api_base.clone()),
            endpoints,
        })
    }

    pub fn endpoints(&self) -> &IntegrationEndpoints {
        &self.endpoints
    }

    async fn load<T: DeserializeOwned>(
        &self,
        service: IntegrationService,
    ) -> Result<Option<T>, AppError> {
        match self.credentials.get_credentials(service.key()).await? {
            Some(blob) => serde_json::from_value(blob).map(Some).map_err(|e| {
                AppError::Internal(format!(
                    "Stored {} credentials are malformed: {}",
                    service.display_name(),
                    e
                ))
            }),
            None => Ok(None),
        }
    }

    async fn require<T: DeserializeOwned>(&self, service: IntegrationService) -> Result<T, AppError> {
        self.load(service).await?.ok_or_else(|| not_configured(service))
    }

    async fn save<T: Serialize>(
        &self,
        service: IntegrationService,
        credentials: &T,
    ) -> Result<(), AppError> {
        let blob = serde_json::to_value(credentials)?;
        self.credentials.save_credentials(service.key(), blob).await
    }

    /// Write the audit row for an operation and hand back its value
    async fn audited<T>(
        &self,
        service: IntegrationService,
        action: &str,
        result: Result<(T, Value), AppError>,
    ) -> Result<T, AppError> {
        let (log_action, metadata, outcome) = match result {
            Ok((value, metadata)) => (format!("{}_{}", service.key(), action), metadata, Ok(value)),
            Err(err) => {
                tracing::error!(service = %service, action, error = %err, "Integration operation failed");
                (
                    format!("{}_{}_error", service.key(), action),
                    json!({ "error": err.to_string() }),
                    Err(err),
                )
            }
        };

        if let Err(e) = self.activity.record(&log_action, metadata).await {
            tracing::warn!(action = %log_action, error = %e, "Failed to write activity log");
        }
        outcome
    }

    /// Current access token, refreshed first when it is about to expire
    async fn google_access_token(&self, service: IntegrationService) -> Result<String, AppError> {
        let mut creds: GoogleOAuthCredentials = self.require(service).await?;
        if !creds.is_authorized() {
            return Err(not_authorized(service));
        }

        if creds.needs_refresh(Utc::now()) {
            let refresh_token = creds.refresh_token.clone().unwrap_or_default();
            let token = self
                .oauth
                .refresh(&creds.client_id, &creds.client_secret, &refresh_token)
                .await
                .map_err(|e| token_error(service, e))?;
            creds.apply_token(token, self.oauth.token_url(), Utc::now());
            self.save(service, &creds).await?;
            tracing::info!(service = %service, "Access token refreshed");
        }

        creds.access_token.ok_or_else(|| not_authorized(service))
    }

    async fn setup_oauth(
        &self,
        service: IntegrationService,
        request: &OAuthSetupRequest,
        scopes: &[&str],
    ) -> Result<(String, Value), AppError> {
        request.validate()?;
        let creds = GoogleOAuthCredentials::new(
            &request.client_id,
            &request.client_secret,
            &request.redirect_uri,
            scopes,
        );
        self.save(service, &creds).await?;

        let auth_url = build_auth_url(
            &self.endpoints.oauth_auth_url,
            &creds.client_id,
            &creds.redirect_uri,
            &creds.scopes,
            service.key(),
        );
        let metadata = json!({
            "client_id": request.client_id,
            "has_secret": !request.client_secret.is_empty(),
        });
        Ok((auth_url, metadata))
    }

    async fn oauth_callback(
        &self,
        service: IntegrationService,
        code: &str,
    ) -> Result<((), Value), AppError> {
        let mut creds: GoogleOAuthCredentials = self.require(service).await?;
        if !creds.has_client() {
            return Err(AppError::IntegrationNotConfigured(format!(
                "{} client_id or client_secret is missing",
                service.display_name()
            )));
        }

        let token = self
            .oauth
            .exchange_code(&creds, code)
            .await
            .map_err(|e| token_error(service, e))?;
        creds.apply_token(token, self.oauth.token_url(), Utc::now());
        self.save(service, &creds).await?;

        let metadata = json!({
            "has_access_token": creds.access_token.is_some(),
            "has_refresh_token": creds.refresh_token.is_some(),
        });
        Ok(((), metadata))
    }

    // YouTube

    /// Store the OAuth client and return the consent URL
    pub async fn setup_youtube(&self, request: &OAuthSetupRequest) -> Result<String, AppError> {
        let result = self.setup_oauth(YouTube, request, &YOUTUBE_SCOPES).await;
        self.audited(YouTube, "credentials_saved", result).await
    }

    pub async fn youtube_callback(&self, code: &str) -> Result<(), AppError> {
        let result = self.oauth_callback(YouTube, code).await;
        self.audited(YouTube, "oauth_callback", result).await
    }

    /// Snippet of the authorized channel
    pub async fn test_youtube(&self) -> Result<Value, AppError> {
        let result: Result<(Value, Value), AppError> = async {
            let token = self.google_access_token(YouTube).await?;
            let channel = self
                .youtube
                .my_channel(&token)
                .await
                .map_err(|e| upstream_error(YouTube, e))?;
            Ok((channel, json!({ "success": true })))
        }
        .await;
        self.audited(YouTube, "connection_test", result).await
    }

    /// Publish a video as unlisted. A thumbnail failure is only logged.
    #[tracing::instrument(skip(self, description, thumbnail), fields(path = %path.display()))]
    pub async fn upload_to_youtube(
        &self,
        path: &Path,
        title: &str,
        description: &str,
        thumbnail: Option<Vec<u8>>,
    ) -> Result<YouTubeUpload, AppError> {
        let result: Result<(YouTubeUpload, Value), AppError> = async {
            let token = self.google_access_token(YouTube).await?;
            let video_id = self
                .youtube
                .upload_video(&token, path, title, description)
                .await
                .map_err(|e| upstream_error(YouTube, e))?;

            let mut thumbnail_set = false;
            if let Some(jpeg) = thumbnail {
                match self.youtube.set_thumbnail(&token, &video_id, jpeg).await {
                    Ok(()) => thumbnail_set = true,
                    Err(e) => tracing::warn!(
                        video_id = %video_id,
                        error = %e,
                        "Failed to set thumbnail, keeping the default"
                    ),
                }
            }

            let url = watch_url(&video_id);
            let metadata = json!({
                "video_id": video_id,
                "title": title,
                "url": url,
                "thumbnail_set": thumbnail_set,
            });
            Ok((
                YouTubeUpload {
                    video_id,
                    url,
                    thumbnail_set,
                },
                metadata,
            ))
        }
        .await;
        self.audited(YouTube, "video_upload", result).await
    }

    // Google Drive

    pub async fn setup_google_drive(&self, request: &OAuthSetupRequest) -> Result<String, AppError> {
        let result = self.setup_oauth(GoogleDrive, request, &DRIVE_SCOPES).await;
        self.audited(GoogleDrive, "credentials_saved", result).await
    }

    pub async fn google_drive_callback(&self, code: &str) -> Result<(), AppError> {
        let result = self.oauth_callback(GoogleDrive, code).await;
        self.audited(GoogleDrive, "oauth_callback", result).await
    }

    /// `about.user` of the authorized account
    pub async fn test_google_drive(&self) -> Result<Value, AppError> {
        let result: Result<(Value, Value), AppError> = async {
            let token = self.google_access_token(GoogleDrive).await?;
            let user = self
                .drive
                .about_user(&token)
                .await
                .map_err(|e| upstream_error(GoogleDrive, e))?;
            Ok((user, json!({ "success": true })))
        }
        .await;
        self.audited(GoogleDrive, "connection_test", result).await
    }

    /// Download a Drive file into `dest_dir`, keeping its file name
    #[tracing::instrument(skip(self, dest_dir))]
    /// Download a Drive file into `dest_dir`. Files larger than `max_bytes` are rejected with
    /// [`AppError::PayloadTooLarge`] from their reported size, or mid-stream when none is reported.
    pub async fn download_from_drive(
        &self,
        file_id: &str,
        dest_dir: &Path,
        max_bytes: u64,
    ) -> Result<DriveDownload, AppError> {
        let result: Result<(DriveDownload, Value), AppError> = async {
            let token = self.google_access_token(GoogleDrive).await?;
            let file = self
                .drive
                .file_metadata(&token, file_id)
                .await
                .map_err(|e| upstream_error(GoogleDrive, e))?;
            if let Some(size) = file.size.filter(|size| *size > max_bytes) {
                return Err(too_large(size, max_bytes));
            }

            let path = dest_dir.join(local_file_name(&file, file_id));
            let size_bytes = self
                .drive
                .download_to(&token, file_id, &path, max_bytes)
                .await
                .map_err(|e| match e {
                    ClientError::TooLarge { limit, .. } => AppError::PayloadTooLarge(format!(
                        "Drive file exceeds max {} bytes",
                        limit
                    )),
                    e => upstream_error(GoogleDrive, e),
                })?;

            let metadata = json!({
                "file_id": file_id,
                "file_name": file.name,
                "size_bytes": size_bytes,
            });
            Ok((
                DriveDownload {
                    file,
                    path,
                    size_bytes,
                },
                metadata,
            ))
        }
        .await;
        self.audited(GoogleDrive, "file_download", result).await
    }

    // Google Ads

    pub async fn setup_google_ads(&self, request: &GoogleAdsSetupRequest) -> Result<(), AppError> {
        let result: Result<((), Value), AppError> = async {
            request.validate()?;
            let creds = GoogleAdsCredentials {
                client_id: request.client_id.clone(),
                client_secret: request.client_secret.clone(),
                refresh_token: request.refresh_token.clone(),
                developer_token: request.developer_token.clone(),
                customer_id: request.customer_id.clone(),
                scopes: ADS_SCOPES.iter().map(|s| s.to_string()).collect(),
                access_token: None,
                expiry: None,
            };
            self.save(GoogleAds, &creds).await?;
            let metadata = json!({
                "client_id": request.client_id,
                "customer_id": request.customer_id,
                "has_developer_token": !request.developer_token.is_empty(),
            });
            Ok(((), metadata))
        }
        .await;
        self.audited(GoogleAds, "credentials_saved", result).await
    }

    /// Prove the stored credentials by refreshing an access token. Returns the customer id.
    pub async fn test_google_ads(&self) -> Result<String, AppError> {
        let result: Result<(String, Value), AppError> = async {
            let mut creds: GoogleAdsCredentials = self.require(GoogleAds).await?;
            if !creds.has_token() {
                return Err(not_authorized(GoogleAds));
            }

            if !creds.refresh_token.is_empty() {
                let token = self
                    .oauth
                    .refresh(&creds.client_id, &creds.client_secret, &creds.refresh_token)
                    .await
                    .map_err(|e| token_error(GoogleAds, e))?;
                let now = Utc::now();
                creds.expiry = token.expires_in.map(|secs| now + ChronoDuration::seconds(secs));
                creds.access_token = Some(token.access_token);
                self.save(GoogleAds, &creds).await?;
            }

            let metadata = json!({
                "customer_id": creds.customer_id,
                "mode": CREDENTIALS_ONLY_MODE,
            });
            Ok((creds.customer_id, metadata))
        }
        .await;
        self.audited(GoogleAds, "connection_test", result).await
    }

    // Telegram

    /// Validate the bot token with `getMe`, then store it
    pub async fn setup_telegram(
        &self,
        request: &TelegramSetupRequest,
    ) -> Result<TelegramBotInfo, AppError> {
        let result: Result<(TelegramBotInfo, Value), AppError> = async {
            request.validate()?;
            let bot_info = self
                .telegram
                .get_me(&request.bot_token)
                .await
                .map_err(|e| upstream_error(Telegram, e))?;
            let creds = TelegramCredentials {
                bot_token: request.bot_token.clone(),
                chat_id: Some(request.chat_id.clone()),
                bot_username: bot_info.username.clone(),
                bot_first_name: Some(bot_info.first_name.clone()),
            };
            self.save(Telegram, &creds).await?;

            let metadata = json!({
                "bot_username": bot_info.username,
                "chat_id": request.chat_id,
            });
            Ok((bot_info, metadata))
        }
        .await;
        self.audited(Telegram, "credentials_saved", result).await
    }

    /// `getMe`, plus a test message when a chat id is stored
    pub async fn test_telegram(&self) -> Result<TelegramTestOutcome, AppError> {
        let result: Result<(TelegramTestOutcome, Value), AppError> = async {
            let creds: TelegramCredentials = self.require(Telegram).await?;
            if creds.bot_token.is_empty() {
                return Err(not_configured(Telegram));
            }
            let bot_info = self
                .telegram
                .get_me(&creds.bot_token)
                .await
                .map_err(|e| upstream_error(Telegram, e))?;

            let message_sent = match creds.chat() {
                Some(chat_id) => {
                    let text = format!(
                        "UAC Creative Manager connection test\nTime: {}",
                        Utc::now().format("%Y-%m-%d %H:%M:%S")
                    );
                    match self
                        .telegram
                        .send_message(&creds.bot_token, chat_id, &text, None)
                        .await
                    {
                        Ok(()) => Some(true),
                        Err(e) => {
                            tracing::warn!(error = %e, "Failed to send Telegram test message");
                            Some(false)
                        }
                    }
                }
                None => None,
            };

            let metadata = json!({ "success": true, "message_sent": message_sent });
            Ok((
                TelegramTestOutcome {
                    bot_info,
                    message_sent,
                },
                metadata,
            ))
        }
        .await;
        self.audited(Telegram, "connection_test", result).await
    }

    /// Notification requested over the API. A rejected body is audited like a failed send.
    pub async fn notify_telegram(&self, request: &TelegramNotifyRequest) -> Result<(), AppError> {
        if let Err(e) = request.validate() {
            let rejected: Result<((), Value), AppError> = Err(e.into());
            return self.audited(Telegram, "notification_sent", rejected).await;
        }
        self.send_telegram_notification(&request.message, request.parse_mode.as_deref())
            .await
    }

    /// Send `message` to the stored chat. `parse_mode` defaults to HTML.
    pub async fn send_telegram_notification(
        &self,
        message: &str,
        parse_mode: Option<&str>,
    ) -> Result<(), AppError> {
        let result: Result<((), Value), AppError> = async {
            let creds: TelegramCredentials = self.require(Telegram).await?;
            let chat_id = match creds.chat() {
                Some(chat_id) if !creds.bot_token.is_empty() => chat_id,
                _ => {
                    return Err(AppError::IntegrationNotConfigured(
                        "Telegram bot token or chat_id is not configured".to_string(),
                    ))
                }
            };
            self.telegram
                .send_message(
                    &creds.bot_token,
                    chat_id,
                    message,
                    Some(parse_mode.unwrap_or(DEFAULT_PARSE_MODE)),
                )
                .await
                .map_err(|e| upstream_error(Telegram, e))?;
            Ok(((), json!({ "message_length": message.chars().count() })))
        }
        .await;
        self.audited(Telegram, "notification_sent", result).await
    }

    /// Whether both a bot token and a chat id are stored
    pub async fn telegram_ready(&self) -> bool {
        match self.load::<TelegramCredentials>(Telegram).await {
            Ok(Some(creds)) => !creds.bot_token.is_empty() && creds.chat().is_some(),
            Ok(None) => false,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read Telegram credentials");
                false
            }
        }
    }

    // Status and settings

    fn is_authorized(service: IntegrationService, blob: &Value) -> bool {
        match service {
            YouTube | GoogleDrive => serde_json::from_value::<GoogleOAuthCredentials>(blob.clone())
                .map(|c| c.is_authorized())
                .unwrap_or(false),
            GoogleAds => serde_json::from_value::<GoogleAdsCredentials>(blob.clone())
                .map(|c| c.has_token())
                .unwrap_or(false),
            Telegram => false,
        }
    }

    /// `configured` for every service, plus `authorized` for the OAuth ones
    pub async fn status(&self) -> Result<BTreeMap<String, IntegrationStatus>, AppError> {
        let mut statuses = BTreeMap::new();
        for service in IntegrationService::ALL {
            let blob = self.credentials.get_credentials(service.key()).await?;
            let authorized = service.uses_oauth().then(|| {
                blob.as_ref()
                    .map(|b| Self::is_authorized(service, b))
                    .unwrap_or(false)
            });
            statuses.insert(
                service.key().to_string(),
                IntegrationStatus {
                    configured: blob.is_some(),
                    authorized,
                },
            );
        }
        Ok(statuses)
    }

    /// Non-secret settings of every configured service. Secrets are reported as `has_*` flags.
    pub async fn settings(&self) -> Result<Map<String, Value>, AppError> {
        let mut settings = Map::new();

        for service in [YouTube, GoogleDrive] {
            if let Some(creds) = self.load::<GoogleOAuthCredentials>(service).await? {
                settings.insert(
                    service.key().to_string(),
                    json!({
                        "client_id": creds.client_id,
                        "redirect_uri": creds.redirect_uri,
                        "scopes": creds.scopes,
                        "has_client_secret": !creds.client_secret.is_empty(),
                        "authorized": creds.is_authorized(),
                    }),
                );
            }
        }

        if let Some(creds) = self.load::<GoogleAdsCredentials>(GoogleAds).await? {
            settings.insert(
                GoogleAds.key().to_string(),
                json!({
                    "client_id": creds.client_id,
                    "customer_id": creds.customer_id,
                    "has_client_secret": !creds.client_secret.is_empty(),
                    "has_developer_token": !creds.developer_token.is_empty(),
                    "has_refresh_token": !creds.refresh_token.is_empty(),
                }),
            );
        }

        if let Some(creds) = self.load::<TelegramCredentials>(Telegram).await? {
            settings.insert(
                Telegram.key().to_string(),
                json!({
                    "chat_id": creds.chat_id,
                    "bot_username": creds.bot_username,
                    "bot_first_name": creds.bot_first_name,
                    "has_bot_token": !creds.bot_token.is_empty(),
                }),
            );
        }

        Ok(settings)
    }
}

impl std::fmt::Debug for IntegrationManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntegrationManager")
            .field("endpoints", &self.endpoints)
            .finish()
    }
}
