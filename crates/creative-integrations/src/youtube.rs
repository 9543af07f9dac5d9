//! YouTube Data API v3: channel lookup, resumable video upload and custom thumbnails.

use crate::client::{ensure_success, transport, ClientResult};
use anyhow::{anyhow, Context};
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::Path;
use tokio_util::io::ReaderStream;

const API: &str = "YouTube";
const UPLOAD_TAG: &str = "UAC Creative Manager";
/// People & Blogs
const CATEGORY_ID: &str = "22";

pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}

/// `videos.insert` resource: unlisted and not made for kids
pub fn video_resource(title: &str, description: &str) -> Value {
    json!({
        "snippet": {
            "title": title,
            "description": description,
            "tags": [UPLOAD_TAG],
            "categoryId": CATEGORY_ID,
        },
        "status": {
            "privacyStatus": "unlisted",
            "madeForKids": false,
            "selfDeclaredMadeForKids": false,
        }
    })
}

fn video_content_type(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("mp4") => "video/mp4",
        Some("mov") => "video/quicktime",
        Some("avi") => "video/x-msvideo",
        Some("mkv") => "video/x-matroska",
        Some("webm") => "video/webm",
        _ => "application/octet-stream",
    }
}

#[derive(Debug, Deserialize)]
struct InsertedVideo {
    id: String,
}

#[derive(Clone)]
pub struct YouTubeClient {
    http: reqwest::Client,
    api_base: String,
    upload_base: String,
}

impl YouTubeClient {
    pub fn new(http: reqwest::Client, api_base: String, upload_base: String) -> Self {
        Self {
            http,
            api_base,
            upload_base,
        }
    }

    /// Snippet of the authorized user's first channel, `{}` when there is none
    #[tracing::instrument(skip_all)]
    pub async fn my_channel(&self, access_token: &str) -> ClientResult<Value> {
        let url = format!("{}/youtube/v3/channels", self.api_base);
        let response = self
            .http
            .get(&url)
            .query(&[("part", "snippet"), ("mine", "true")])
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(transport(API))?;
        let body: Value = ensure_success(response, API)
            .await?
            .json()
            .await
            .map_err(transport(API))?;

        Ok(body
            .get("items")
            .and_then(|items| items.get(0))
            .and_then(|item| item.get("snippet"))
            .cloned()
            .unwrap_or_else(|| json!({})))
    }

    /// Upload with the resumable protocol and return the video id.
    ///
    /// The session is opened with the metadata, then the file is streamed to the session URL
    /// in a single PUT.
    #[tracing::instrument(skip(self, access_token, description), fields(path = %path.display()))]
    pub async fn upload_video(
        &self,
        access_token: &str,
        path: &Path,
        title: &str,
        description: &str,
    ) -> ClientResult<String> {
        let size = tokio::fs::metadata(path)
            .await
            .with_context(|| format!("Failed to stat {}", path.display()))?
            .len();
        let content_type = video_content_type(path);

        let url = format!("{}/upload/youtube/v3/videos", self.upload_base);
        let response = self
            .http
            .post(&url)
            .query(&[("uploadType", "resumable"), ("part", "snippet,status")])
            .bearer_auth(access_token)
            .header("X-Upload-Content-Type", content_type)
            .header("X-Upload-Content-Length", size.to_string())
            .json(&video_resource(title, description))
            .send()
            .await
            .map_err(transport(API))?;
        let response = ensure_success(response, API).await?;

        let session_url = response
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| anyhow!("YouTube did not return an upload session URL"))?;

        let file = tokio::fs::File::open(path)
            .await
            .with_context(|| format!("Failed to open {}", path.display()))?;
        let response = self
            .http
            .put(&session_url)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .header(reqwest::header::CONTENT_LENGTH, size)
            .body(reqwest::Body::wrap_stream(ReaderStream::new(file)))
            .send()
            .await
            .map_err(transport(API))?;
        let video: InsertedVideo = ensure_success(response, API)
            .await?
            .json()
            .await
            .map_err(transport(API))?;

        tracing::info!(video_id = %video.id, size_bytes = size, "Video uploaded to YouTube");
        Ok(video.id)
    }

    /// Set a custom JPEG thumbnail on an uploaded video
    #[tracing::instrument(skip(self, access_token, jpeg), fields(size_bytes = jpeg.len()))]
    pub async fn set_thumbnail(
        &self,
        access_token: &str,
        video_id: &str,
        jpeg: Vec<u8>,
    ) -> ClientResult<()> {
        let url = format!("{}/upload/youtube/v3/thumbnails/set", self.upload_base);
        let response = self
            .http
            .post(&url)
            .query(&[("videoId", video_id)])
            .bearer_auth(access_token)
            .header(reqwest::header::CONTENT_TYPE, "image/jpeg")
            .body(jpeg)
            .send()
            .await
            .map_err(transport(API))?;
        ensure_success(response, API).await?;
        Ok(())
    }
}

impl std::fmt::Debug for YouTubeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YouTubeClient")
            .field("api_base", &self.api_base)
            .field("upload_base", &self.upload_base)
            .finish()
    }
}
