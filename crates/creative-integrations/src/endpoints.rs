/// Base URLs of every upstream API the integrations talk to.
///
/// Production uses [`IntegrationEndpoints::default`]. Tests point everything at a single mock
/// server with [`IntegrationEndpoints::with_base_url`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrationEndpoints {
    /// Google OAuth consent page
    pub oauth_auth_url: String,
    /// Google OAuth token endpoint
    pub oauth_token_url: String,
    /// Host of the YouTube Data and Drive v3 REST APIs
    pub google_api_base: String,
    /// Host of the media upload endpoints (`/upload/youtube/v3/...`)
    pub google_upload_base: String,
    pub telegram_api_base: String,
}

impl Default for IntegrationEndpoints {
    fn default() -> Self {
        Self {
            oauth_auth_url: "https://accounts.google.com/o/oauth2/auth".to_string(),
            oauth_token_url: "https://oauth2.googleapis.com/token".to_string(),
            google_api_base: "https://www.googleapis.com".to_string(),
            google_upload_base: "https://www.googleapis.com".to_string(),
            telegram_api_base: "https://api.telegram.org".to_string(),
        }
    }
}

impl IntegrationEndpoints {
    /// Route every service through `base_url`, keeping the upstream paths
    pub fn with_base_url(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            oauth_auth_url: format!("{}/o/oauth2/auth", base),
            oauth_token_url: format!("{}/token", base),
            google_api_base: base.to_string(),
            google_upload_base: base.to_string(),
            telegram_api_base: base.to_string(),
        }
    }
}
