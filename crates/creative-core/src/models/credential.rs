use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stored credentials for one third-party service. `credentials` is an opaque JSON blob
/// whose shape depends on the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OAuthCredential {
    pub id: Uuid,
    pub service: String,
    pub credentials: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Third-party services the manager integrates with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntegrationService {
    YouTube,
    GoogleDrive,
    GoogleAds,
    Telegram,
}

impl IntegrationService {
    pub const ALL: [IntegrationService; 4] = [
        IntegrationService::YouTube,
        IntegrationService::GoogleDrive,
        IntegrationService::GoogleAds,
        IntegrationService::Telegram,
    ];

    /// Key used for the `oauth_credentials.service` column and log action prefixes
    pub fn key(&self) -> &'static str {
        match self {
            IntegrationService::YouTube => "youtube",
            IntegrationService::GoogleDrive => "google_drive",
            IntegrationService::GoogleAds => "google_ads",
            IntegrationService::Telegram => "telegram",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            IntegrationService::YouTube => "YouTube",
            IntegrationService::GoogleDrive => "Google Drive",
            IntegrationService::GoogleAds => "Google Ads",
            IntegrationService::Telegram => "Telegram",
        }
    }

    /// Whether the service goes through the OAuth consent flow
    pub fn uses_oauth(&self) -> bool {
        !matches!(self, IntegrationService::Telegram)
    }
}

impl fmt::Display for IntegrationService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
