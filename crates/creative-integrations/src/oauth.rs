//! Google OAuth 2.0: consent URL, code exchange and token refresh.

use crate::client::{ensure_success, transport, ClientResult};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

pub const YOUTUBE_SCOPES: [&str; 2] = [
    "https://www.googleapis.com/auth/youtube.upload",
    "https://www.googleapis.com/auth/youtube.readonly",
];

pub const DRIVE_SCOPES: [&str; 2] = [
    "https://www.googleapis.com/auth/drive.readonly",
    "https://www.googleapis.com/auth/drive.file",
];

pub const ADS_SCOPES: [&str; 1] = ["https://www.googleapis.com/auth/adwords"];

/// Access tokens are refreshed this long before they expire
const REFRESH_MARGIN_SECS: i64 = 60;

/// Credential blob stored for YouTube and Google Drive.
///
/// After setup only the client registration is present; the token fields are filled in by the
/// OAuth callback.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GoogleOAuthCredentials {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default)]
    pub redirect_uri: String,
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<DateTime<Utc>>,
}

impl GoogleOAuthCredentials {
    pub fn new(client_id: &str, client_secret: &str, redirect_uri: &str, scopes: &[&str]) -> Self {
        Self {
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            redirect_uri: redirect_uri.to_string(),
            scopes: scopes.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn has_client(&self) -> bool {
        !self.client_id.is_empty() && !self.client_secret.is_empty()
    }

    pub fn is_authorized(&self) -> bool {
        self.access_token.as_deref().is_some_and(|t| !t.is_empty())
            || self.refresh_token.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// Whether the access token expires within the refresh margin and can be refreshed
    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        let refreshable = self.refresh_token.as_deref().is_some_and(|t| !t.is_empty());
        let expiring = match self.expiry {
            Some(expiry) => expiry - now <= Duration::seconds(REFRESH_MARGIN_SECS),
            None => self.access_token.is_none(),
        };
        refreshable && expiring
    }

    /// Merge a token response. A missing refresh token keeps the stored one.
    pub fn apply_token(&mut self, token: TokenResponse, token_uri: &str, now: DateTime<Utc>) {
        self.access_token = Some(token.access_token);
        if let Some(refresh_token) = token.refresh_token {
            self.refresh_token = Some(refresh_token);
        }
        self.token_uri = Some(token_uri.to_string());
        self.expiry = token.expires_in.map(|secs| now + Duration::seconds(secs));
    }
}

/// Consent page URL requesting offline access
pub fn build_auth_url(
    auth_url: &str,
    client_id: &str,
    redirect_uri: &str,
    scopes: &[String],
    state: &str,
) -> String {
    format!(
        "{}?response_type=code&client_id={}&redirect_uri={}&scope={}&access_type=offline&prompt=consent&state={}",
        auth_url,
        urlencoding::encode(client_id),
        urlencoding::encode(redirect_uri),
        urlencoding::encode(&scopes.join(" ")),
        urlencoding::encode(state),
    )
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
}

/// Client for the Google token endpoint
#[derive(Clone)]
pub struct OAuthClient {
    http: reqwest::Client,
    token_url: String,
}

impl OAuthClient {
    pub fn new(http: reqwest::Client, token_url: String) -> Self {
        Self { http, token_url }
    }

    pub fn token_url(&self) -> &str {
        &self.token_url
    }

    /// Exchange an authorization code (`grant_type=authorization_code`)
    #[tracing::instrument(skip(self, credentials, code))]
    pub async fn exchange_code(
        &self,
        credentials: &GoogleOAuthCredentials,
        code: &str,
    ) -> ClientResult<TokenResponse> {
        self.request_token(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", &credentials.client_id),
            ("client_secret", &credentials.client_secret),
            ("redirect_uri", &credentials.redirect_uri),
        ])
        .await
    }

    /// Mint a new access token from a refresh token (`grant_type=refresh_token`)
    #[tracing::instrument(skip_all)]
    pub async fn refresh(
        &self,
        client_id: &str,
        client_secret: &str,
        refresh_token: &str,
    ) -> ClientResult<TokenResponse> {
        self.request_token(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", client_id),
            ("client_secret", client_secret),
        ])
        .await
    }

    async fn request_token(&self, form: &[(&str, &str)]) -> ClientResult<TokenResponse> {
        let response = self
            .http
            .post(&self.token_url)
            .form(form)
            .send()
            .await
            .map_err(transport("Google OAuth"))?;
        let response = ensure_success(response, "Google OAuth").await?;
        response.json().await.map_err(transport("Google OAuth"))
    }
}

impl std::fmt::Debug for OAuthClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthClient")
            .field("token_url", &self.token_url)
            .finish()
    }
}
