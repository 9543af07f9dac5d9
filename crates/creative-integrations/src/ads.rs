//! Google Ads credentials. Only the OAuth side is exercised; no Ads API queries are made.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reported by the connection test: the credentials were verified, no Ads query was run
pub const CREDENTIALS_ONLY_MODE: &str = "credentials_only";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GoogleAdsCredentials {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default)]
    pub refresh_token: String,
    #[serde(default)]
    pub developer_token: String,
    #[serde(default)]
    pub customer_id: String,
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<DateTime<Utc>>,
}

impl GoogleAdsCredentials {
    pub fn has_token(&self) -> bool {
        !self.refresh_token.is_empty() || self.access_token.as_deref().is_some_and(|t| !t.is_empty())
    }
}
