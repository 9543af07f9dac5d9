//! Google Drive v3: account info, file metadata and media download.

use crate::client::{ensure_success, transport, ClientError, ClientResult};
use anyhow::Context;
use regex::Regex;
use serde::{Deserialize, Deserializer};
use serde_json::{json, Value};
use std::path::Path;
use std::sync::LazyLock;
use tokio::io::AsyncWriteExt;

const API: &str = "Google Drive";

static FILE_ID_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        r"/file/d/([A-Za-z0-9_-]+)",
        r"[?&]id=([A-Za-z0-9_-]+)",
        r"^([A-Za-z0-9_-]{10,})$",
    ]
    .map(|pattern| Regex::new(pattern).expect("valid Drive file id pattern"))
});

/// Pull the file id out of a Drive share link.
///
/// Accepts `/file/d/<id>/...`, `?id=<id>`, `/open?id=<id>` and a bare id.
pub fn extract_drive_file_id(url: &str) -> Option<String> {
    let url = url.trim();
    FILE_ID_PATTERNS
        .iter()
        .find_map(|re| re.captures(url).and_then(|c| c.get(1)))
        .map(|id| id.as_str().to_string())
}

/// Drive reports `size` as a decimal string
fn size_from_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.parse().ok()))
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DriveFile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default, deserialize_with = "size_from_string")]
    pub size: Option<u64>,
}

#[derive(Clone)]
pub struct DriveClient {
    http: reqwest::Client,
    api_base: String,
}

impl DriveClient {
    pub fn new(http: reqwest::Client, api_base: String) -> Self {
        Self { http, api_base }
    }

    /// `about.user` of the authorized account
    #[tracing::instrument(skip_all)]
    pub async fn about_user(&self, access_token: &str) -> ClientResult<Value> {
        let url = format!("{}/drive/v3/about", self.api_base);
        let response = self
            .http
            .get(&url)
            .query(&[("fields", "user")])
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(transport(API))?;
        let body: Value = ensure_success(response, API)
            .await?
            .json()
            .await
            .map_err(transport(API))?;
        Ok(body.get("user").cloned().unwrap_or_else(|| json!({})))
    }

    #[tracing::instrument(skip(self, access_token))]
    pub async fn file_metadata(&self, access_token: &str, file_id: &str) -> ClientResult<DriveFile> {
        let url = format!("{}/drive/v3/files/{}", self.api_base, file_id);
        let response = self
            .http
            .get(&url)
            .query(&[("fields", "id,name,mimeType,size")])
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(transport(API))?;
        ensure_success(response, API)
            .await?
            .json()
            .await
            .map_err(transport(API))
    }

    /// Stream the file content to `dest`. Returns the number of bytes written.
    ///
    /// Stops and removes `dest` once more than `max_bytes` have arrived.
    #[tracing::instrument(skip(self, access_token), fields(dest = %dest.display()))]
    pub async fn download_to(
        &self,
        access_token: &str,
        file_id: &str,
        dest: &Path,
        max_bytes: u64,
    ) -> ClientResult<u64> {
        let url = format!("{}/drive/v3/files/{}", self.api_base, file_id);
        let response = self
            .http
            .get(&url)
            .query(&[("alt", "media")])
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(transport(API))?;
        let mut response = ensure_success(response, API).await?;

        let mut file = tokio::fs::File::create(dest)
            .await
            .with_context(|| format!("Failed to create {}", dest.display()))?;
        let mut written = 0u64;
        while let Some(chunk) = response.chunk().await.map_err(transport(API))? {
            if written + chunk.len() as u64 > max_bytes {
                drop(file);
                if let Err(e) = tokio::fs::remove_file(dest).await {
                    tracing::warn!(error = %e, "Failed to remove partial Drive download");
                }
                return Err(ClientError::TooLarge {
                    api: API,
                    limit: max_bytes,
                });
            }
            file.write_all(&chunk)
                .await
                .context("Failed to write Drive download")?;
            written += chunk.len() as u64;
        }
        file.flush().await.context("Failed to flush Drive download")?;

        tracing::info!(size_bytes = written, "Drive file downloaded");
        Ok(written)
    }
}

impl std::fmt::Debug for DriveClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DriveClient")
            .field("api_base", &self.api_base)
            .finish()
    }
}
