//! Video upload orchestration.
//!
//! One upload runs to completion inside the request: acquire the source (multipart or Drive),
//! strip metadata, build the thumbnail, publish to YouTube, record the row, optionally derive
//! letterboxed variants, then audit and notify. Work files live in a per-request temp dir that
//! is removed when the pipeline returns.

use crate::error::HttpAppError;
use crate::state::{AppState, DbState, IntegrationState, MediaState};
use crate::utils::upload::{sanitize_filename, UploadedFile};
use chrono::NaiveDate;
use creative_core::models::{
    BatchItemResult, BatchUploadResponse, FormatUploadResult, NewUpload, SourceOrientation,
    ThumbnailType, VideoUploadResponse,
};
use creative_core::AppError;
use creative_integrations::extract_drive_file_id;
use creative_processing::video::resolve_orientation;
use creative_processing::{create_other_formats, ThumbnailSource};
use creative_storage::keys::{thumbnail_key, video_key};
use serde_json::json;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use uuid::Uuid;

/// Where the video comes from
#[derive(Debug, Clone)]
pub enum VideoInput {
    Local(UploadedFile),
    /// Google Drive share link or bare file id
    Drive(String),
}

impl VideoInput {
    fn kind(&self) -> &'static str {
        match self {
            VideoInput::Local(_) => "local",
            VideoInput::Drive(_) => "drive",
        }
    }
}

#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub campaign_name: String,
    pub input: VideoInput,
    pub thumbnail: ThumbnailType,
    pub modal_image_id: Option<Uuid>,
    pub description: String,
    pub create_formats: bool,
    pub source_orientation: SourceOrientation,
    pub template_id: Option<Uuid>,
    pub ad_group: Option<String>,
    /// Overrides the `"{campaign} {date}"` title
    pub title: Option<String>,
}

#[derive(Debug, Clone)]
pub struct BatchUploadRequest {
    pub campaign_name: String,
    pub files: Vec<UploadedFile>,
    pub thumbnail: ThumbnailType,
    pub modal_image_id: Option<Uuid>,
    pub description: String,
    pub create_formats: bool,
    pub template_id: Option<Uuid>,
}

/// `"{campaign} {dd-mm-yy}"`
pub fn video_title(campaign_name: &str, date: NaiveDate) -> String {
    format!("{} {}", campaign_name.trim(), date.format("%d-%m-%y"))
}

/// Title of the `n`-th (1-based) item of a batch; single-file batches keep the plain title.
pub fn batch_item_title(campaign_name: &str, date: NaiveDate, n: usize, total: usize) -> String {
    let title = video_title(campaign_name, date);
    if total > 1 {
        format!("{} #{}", title, n)
    } else {
        title
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// HTML message posted to Telegram after an upload
pub fn upload_notification(response: &VideoUploadResponse, campaign_name: &str) -> String {
    let mut message = format!(
        "<b>New creative uploaded</b>\nCampaign: {}\nTitle: {}\nThumbnail: {}\n{}",
        escape_html(campaign_name),
        escape_html(&response.video_title),
        response.thumbnail_type,
        response.youtube_url,
    );
    if let Some(formats) = &response.formats {
        for format in formats.iter().filter(|f| f.success) {
            if let Some(url) = &format.youtube_url {
                message.push_str(&format!("\n{}: {}", format.orientation, url));
            }
        }
    }
    message
}

/// Runs uploads against the application services
#[derive(Clone)]
pub struct UploadPipeline {
    db: DbState,
    media: MediaState,
    integrations: IntegrationState,
}

impl UploadPipeline {
    pub fn new(state: &AppState) -> Self {
        Self {
            db: state.db.clone(),
            media: state.media.clone(),
            integrations: state.integrations.clone(),
        }
    }

    #[tracing::instrument(
        skip(self, request),
        fields(
            campaign = %request.campaign_name,
            source = request.input.kind(),
            upload_id = tracing::field::Empty
        )
    )]
    pub async fn run(&self, request: UploadRequest) -> Result<VideoUploadResponse, HttpAppError> {
        let upload_id = Uuid::new_v4();
        tracing::Span::current().record("upload_id", tracing::field::display(upload_id));

        let title = request
            .title
            .clone()
            .unwrap_or_else(|| video_title(&request.campaign_name, today()));

        // Fail on a bad modal before any expensive work
        let thumbnail_source = self
            .thumbnail_source(request.thumbnail, request.modal_image_id)
            .await?;

        let work_dir = tempfile::Builder::new()
            .prefix("creative-upload-")
            .tempdir()
            .map_err(|e| AppError::Internal(format!("Failed to create work directory: {}", e)))?;

        let source = self.acquire_source(upload_id, &request.input, &work_dir).await?;

        let processed = work_dir.path().join(processed_name(&source));
        let stripped = self
            .media
            .ffmpeg
            .process_video(&source, &processed)
            .await
            .map_err(|e| AppError::MediaConversionError(e.to_string()))?;
        tracing::debug!(stripped, "Source video processed");

        let (thumbnail, thumbnail_ref) = self
            .build_thumbnail(
                upload_id,
                &thumbnail_source,
                request.modal_image_id,
                &processed,
                work_dir.path(),
            )
            .await?;

        let youtube = self
            .integrations
            .manager
            .upload_to_youtube(&processed, &title, &request.description, thumbnail)
            .await?;

        self.db
            .upload_repository
            .create_upload(NewUpload {
                id: upload_id,
                template_id: request.template_id,
                youtube_url: youtube.url.clone(),
                video_title: title.clone(),
                campaign_name: request.campaign_name.clone(),
                thumbnail_type: request.thumbnail,
                thumbnail_ref,
                ad_group: request.ad_group.clone(),
            })
            .await?;

        let formats = if request.create_formats {
            Some(
                self.publish_formats(&request, &title, &processed, work_dir.path())
                    .await?,
            )
        } else {
            None
        };

        let response = VideoUploadResponse {
            success: true,
            upload_id,
            youtube_url: youtube.url,
            video_title: title,
            thumbnail_type: request.thumbnail,
            formats,
        };

        self.db
            .log_repository
            .record_best_effort(
                "video_uploaded",
                json!({
                    "upload_id": upload_id,
                    "youtube_url": response.youtube_url,
                    "video_title": response.video_title,
                    "campaign_name": request.campaign_name,
                    "thumbnail_type": request.thumbnail,
                    "thumbnail_set": youtube.thumbnail_set,
                    "source": request.input.kind(),
                    "formats_created": formats_created(&response),
                }),
            )
            .await;

        self.notify(&response, &request.campaign_name).await;

        tracing::info!(youtube_url = %response.youtube_url, "Upload completed");
        Ok(response)
    }

    /// Process every file in order. A failed item is logged and reported; the rest still run.
    #[tracing::instrument(skip(self, request), fields(campaign = %request.campaign_name, total = request.files.len()))]
    pub async fn run_batch(&self, request: BatchUploadRequest) -> BatchUploadResponse {
        let total = request.files.len();
        let date = today();
        let mut results = Vec::with_capacity(total);

        for (index, file) in request.files.into_iter().enumerate() {
            let filename = file.filename.clone();
            let item = UploadRequest {
                campaign_name: request.campaign_name.clone(),
                input: VideoInput::Local(file),
                thumbnail: request.thumbnail,
                modal_image_id: request.modal_image_id,
                description: request.description.clone(),
                create_formats: request.create_formats,
                source_orientation: SourceOrientation::Auto,
                template_id: request.template_id,
                ad_group: None,
                title: Some(batch_item_title(
                    &request.campaign_name,
                    date,
                    index + 1,
                    total,
                )),
            };

            match self.run(item).await {
                Ok(response) => results.push(BatchItemResult {
                    index,
                    filename,
                    success: true,
                    upload_id: Some(response.upload_id),
                    youtube_url: Some(response.youtube_url),
                    video_title: Some(response.video_title),
                    error: None,
                }),
                Err(HttpAppError(e)) => {
                    tracing::warn!(index, filename = %filename, error = %e, "Batch item failed");
                    self.db
                        .log_repository
                        .record_best_effort(
                            "batch_item_error",
                            json!({
                                "index": index,
                                "filename": filename,
                                "campaign_name": request.campaign_name,
                                "error": e.to_string(),
                            }),
                        )
                        .await;
                    results.push(BatchItemResult {
                        index,
                        filename,
                        success: false,
                        upload_id: None,
                        youtube_url: None,
                        video_title: None,
                        error: Some(e.to_string()),
                    });
                }
            }
        }

        let succeeded = results.iter().filter(|r| r.success).count();
        BatchUploadResponse {
            success: true,
            total,
            succeeded,
            failed: total - succeeded,
            results,
        }
    }

    async fn thumbnail_source(
        &self,
        thumbnail: ThumbnailType,
        modal_image_id: Option<Uuid>,
    ) -> Result<ThumbnailSource, HttpAppError> {
        match thumbnail {
            ThumbnailType::None => Ok(ThumbnailSource::None),
            ThumbnailType::FirstFrame => Ok(ThumbnailSource::FirstFrame),
            ThumbnailType::CustomModal => {
                let modal_id = modal_image_id.ok_or_else(|| {
                    AppError::InvalidInput(
                        "modal_image_id is required when thumbnail_option is custom_modal"
                            .to_string(),
                    )
                })?;
                let modal = self
                    .db
                    .modal_repository
                    .get_modal(modal_id)
                    .await?
                    .ok_or_else(|| AppError::NotFound("Modal image not found".to_string()))?;
                let png = self.media.storage.download(&modal.file_path).await?;
                Ok(ThumbnailSource::Modal(png))
            }
        }
    }

    /// Local path of the source video inside `work_dir`
    async fn acquire_source(
        &self,
        upload_id: Uuid,
        input: &VideoInput,
        work_dir: &TempDir,
    ) -> Result<PathBuf, HttpAppError> {
        match input {
            VideoInput::Local(file) => {
                self.media.video_validator.validate_all(
                    &file.filename,
                    &file.content_type,
                    file.data.len(),
                )?;
                let filename = sanitize_filename(&file.filename)?;

                self.media
                    .storage
                    .upload_with_key(
                        &video_key(upload_id, &filename),
                        file.data.to_vec(),
                        &file.content_type,
                    )
                    .await?;

                let path = work_dir.path().join(&filename);
                tokio::fs::write(&path, &file.data).await.map_err(|e| {
                    AppError::Internal(format!("Failed to write work file: {}", e))
                })?;
                Ok(path)
            }
            VideoInput::Drive(url) => {
                let file_id = extract_drive_file_id(url).ok_or_else(|| {
                    AppError::InvalidInput("drive_url is not a Google Drive file link".to_string())
                })?;
                let max_bytes = self.media.video_validator.max_file_size() as u64;
                let download = self
                    .integrations
                    .manager
                    .download_from_drive(&file_id, work_dir.path(), max_bytes)
                    .await?;
                self.media
                    .video_validator
                    .validate_file_size(download.size_bytes as usize)?;
                Ok(download.path)
            }
        }
    }

    /// JPEG thumbnail for YouTube and the `thumbnail_ref` to store. Generation failures only
    /// drop the thumbnail.
    async fn build_thumbnail(
        &self,
        upload_id: Uuid,
        source: &ThumbnailSource,
        modal_image_id: Option<Uuid>,
        video: &Path,
        work_dir: &Path,
    ) -> Result<(Option<Vec<u8>>, Option<String>), HttpAppError> {
        let jpeg = match self
            .media
            .thumbnails
            .process_thumbnail(source, video, work_dir)
            .await
        {
            Ok(Some(jpeg)) => jpeg,
            Ok(None) => return Ok((None, None)),
            Err(e) => {
                tracing::warn!(error = %e, "Thumbnail generation failed, uploading without one");
                return Ok((None, None));
            }
        };

        let key = thumbnail_key(upload_id);
        self.media
            .storage
            .upload_with_key(&key, jpeg.clone(), "image/jpeg")
            .await?;

        let thumbnail_ref = match source {
            ThumbnailSource::Modal(_) => modal_image_id.map(|id| id.to_string()),
            _ => Some(key),
        };
        Ok((Some(jpeg), thumbnail_ref))
    }

    async fn publish_formats(
        &self,
        request: &UploadRequest,
        title: &str,
        processed: &Path,
        work_dir: &Path,
    ) -> Result<Vec<FormatUploadResult>, HttpAppError> {
        let orientation =
            resolve_orientation(request.source_orientation, &self.media.probe, processed).await;

        let formats_dir = work_dir.join("formats");
        tokio::fs::create_dir_all(&formats_dir)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to create formats directory: {}", e)))?;

        let derived =
            create_other_formats(&self.media.ffmpeg, processed, orientation, &formats_dir).await;

        let mut results = Vec::with_capacity(derived.len());
        for format in derived {
            let format_title = format!("{} [{}]", title, format.orientation);
            match self.publish_format(request, &format_title, &format.path).await {
                Ok((upload_id, youtube_url)) => results.push(FormatUploadResult {
                    orientation: format.orientation,
                    success: true,
                    letterboxed: format.letterboxed,
                    upload_id: Some(upload_id),
                    youtube_url: Some(youtube_url),
                    error: None,
                }),
                Err(e) => {
                    tracing::warn!(
                        orientation = %format.orientation,
                        error = %e,
                        "Format upload failed"
                    );
                    results.push(FormatUploadResult {
                        orientation: format.orientation,
                        success: false,
                        letterboxed: format.letterboxed,
                        upload_id: None,
                        youtube_url: None,
                        error: Some(e.to_string()),
                    });
                }
            }
        }
        Ok(results)
    }

    async fn publish_format(
        &self,
        request: &UploadRequest,
        title: &str,
        path: &Path,
    ) -> Result<(Uuid, String), AppError> {
        let youtube = self
            .integrations
            .manager
            .upload_to_youtube(path, title, &request.description, None)
            .await?;
        let upload = self
            .db
            .upload_repository
            .create_upload(NewUpload {
                id: Uuid::new_v4(),
                template_id: request.template_id,
                youtube_url: youtube.url,
                video_title: title.to_string(),
                campaign_name: request.campaign_name.clone(),
                thumbnail_type: ThumbnailType::None,
                thumbnail_ref: None,
                ad_group: request.ad_group.clone(),
            })
            .await?;
        Ok((upload.id, upload.youtube_url))
    }

    async fn notify(&self, response: &VideoUploadResponse, campaign_name: &str) {
        let integrations = &self.integrations;
        if !integrations.notify_on_upload || !integrations.manager.telegram_ready().await {
            return;
        }
        let message = upload_notification(response, campaign_name);
        if let Err(e) = integrations
            .manager
            .send_telegram_notification(&message, None)
            .await
        {
            tracing::warn!(error = %e, "Upload notification failed");
        }
    }
}

fn formats_created(response: &VideoUploadResponse) -> usize {
    response
        .formats
        .as_ref()
        .map_or(0, |formats| formats.iter().filter(|f| f.success).count())
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// `processed.<ext>` keeping the container of the source
fn processed_name(source: &Path) -> String {
    match source.extension().and_then(|e| e.to_str()) {
        Some(ext) if !ext.is_empty() => format!("processed.{}", ext.to_ascii_lowercase()),
        _ => "processed.mp4".to_string(),
    }
}
