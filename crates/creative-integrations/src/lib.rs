//! Clients for the external services a creative passes through: YouTube, Google Drive,
//! Google Ads and Telegram.
//!
//! Credentials are persisted through [`creative_db::CredentialStore`] and every operation is
//! recorded through [`creative_db::ActivityLog`]; [`IntegrationManager`] ties the two to the
//! HTTP clients.

pub mod ads;
pub mod client;
pub mod drive;
pub mod endpoints;
pub mod manager;
pub mod oauth;
pub mod telegram;
pub mod youtube;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use client::{ClientError, ClientResult};
pub use drive::{extract_drive_file_id, DriveClient, DriveFile};
pub use endpoints::IntegrationEndpoints;
pub use manager::{DriveDownload, IntegrationManager, TelegramTestOutcome, YouTubeUpload};
pub use oauth::GoogleOAuthCredentials;
pub use telegram::TelegramClient;
pub use youtube::YouTubeClient;
