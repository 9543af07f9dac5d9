//! `POST /upload/video`

use super::audited;
use crate::error::{ErrorResponse, HttpAppError};
use crate::services::{UploadPipeline, UploadRequest, VideoInput};
use crate::state::AppState;
use crate::utils::upload::MultipartForm;
use axum::{
    extract::{Multipart, State},
    Json,
};
use creative_core::models::{
    SourceOrientation, ThumbnailType, VideoSource, VideoUploadResponse,
};
use creative_core::AppError;
use std::sync::Arc;

/// Turn the multipart form into a pipeline request. Parse errors are 400s.
fn parse_upload_form(mut form: MultipartForm) -> Result<UploadRequest, AppError> {
    let campaign_name = form.required_text("campaign_name")?.to_string();
    let source: VideoSource = form.text("video_source").unwrap_or_default().parse()?;
    let thumbnail: ThumbnailType = form.text("thumbnail_option").unwrap_or_default().parse()?;
    let source_orientation: SourceOrientation =
        form.text("source_orientation").unwrap_or_default().parse()?;
    let modal_image_id = form.uuid("modal_image_id")?;
    let template_id = form.uuid("template_id")?;
    let description = form.text("description").unwrap_or_default().to_string();
    let ad_group = form.text("ad_group").map(str::to_string);
    let create_formats = form.flag("create_formats");

    let input = match source {
        VideoSource::Local => VideoInput::Local(form.take_file("video_file").ok_or_else(|| {
            AppError::InvalidInput("video_file is required for local uploads".to_string())
        })?),
        VideoSource::Drive => VideoInput::Drive(
            form.text("drive_url")
                .ok_or_else(|| {
                    AppError::InvalidInput("drive_url is required for drive uploads".to_string())
                })?
                .to_string(),
        ),
    };

    Ok(UploadRequest {
        campaign_name,
        input,
        thumbnail,
        modal_image_id,
        description,
        create_formats,
        source_orientation,
        template_id,
        ad_group,
        title: None,
    })
}

#[utoipa::path(
    post,
    path = "/upload/video",
    tag = "uploads",
    request_body(
        content = inline(Object),
        description = "Multipart form: campaign_name, video_source (local|drive), drive_url, thumbnail_option (none|first_frame|custom_modal), modal_image_id, video_file, description, create_formats, source_orientation, template_id, ad_group",
        content_type = "multipart/form-data"
    ),
    responses(
        (status = 200, description = "Video published", body = VideoUploadResponse),
        (status = 400, description = "Invalid form or file", body = ErrorResponse),
        (status = 401, description = "YouTube is not authorized", body = ErrorResponse),
        (status = 404, description = "Modal image not found", body = ErrorResponse),
        (status = 413, description = "Video too large", body = ErrorResponse),
        (status = 500, description = "Processing or storage failure", body = ErrorResponse),
        (status = 502, description = "Upstream integration failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all, fields(operation = "upload_video"))]
pub async fn upload_video(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<VideoUploadResponse>, HttpAppError> {
    let result: Result<VideoUploadResponse, HttpAppError> = async {
        let form = MultipartForm::from_multipart(multipart).await?;
        let request = parse_upload_form(form)?;
        UploadPipeline::new(&state).run(request).await
    }
    .await;
    audited(&state.db.log_repository, "upload_video", result)
        .await
        .map(Json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::upload::UploadedFile;
    use bytes::Bytes;

    fn video_file() -> UploadedFile {
        UploadedFile {
            filename: "ad.mp4".to_string(),
            content_type: "video/mp4".to_string(),
            data: Bytes::from_static(b"not really a video"),
        }
    }

    #[test]
    fn test_parse_local_upload() {
        let form = MultipartForm::with(
            &[
                ("campaign_name", "Spring Sale"),
                ("thumbnail_option", "first_frame"),
                ("create_formats", "true"),
                ("source_orientation", "vertical"),
            ],
            vec![("video_file", video_file())],
        );
        let request = parse_upload_form(form).unwrap();
        assert_eq!(request.campaign_name, "Spring Sale");
        assert_eq!(request.thumbnail, ThumbnailType::FirstFrame);
        assert!(request.create_formats);
        assert!(matches!(request.input, VideoInput::Local(ref f) if f.filename == "ad.mp4"));
        assert!(request.title.is_none());
    }

    #[test]
    fn test_parse_requires_campaign_name() {
        let form = MultipartForm::with(&[], vec![("video_file", video_file())]);
        let err = parse_upload_form(form).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(msg) if msg.contains("campaign_name")));
    }

    #[test]
    fn test_parse_local_without_file_is_rejected() {
        let form = MultipartForm::with(&[("campaign_name", "c")], vec![]);
        assert!(matches!(
            parse_upload_form(form),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_parse_drive_requires_url() {
        let form = MultipartForm::with(
            &[("campaign_name", "c"), ("video_source", "drive")],
            vec![],
        );
        assert!(parse_upload_form(form).is_err());

        let form = MultipartForm::with(
            &[
                ("campaign_name", "c"),
                ("video_source", "drive"),
                ("drive_url", "https://drive.google.com/file/d/abc123/view"),
            ],
            vec![],
        );
        let request = parse_upload_form(form).unwrap();
        assert!(matches!(request.input, VideoInput::Drive(ref url) if url.contains("abc123")));
    }

    #[test]
    fn test_parse_rejects_unknown_thumbnail_option() {
        let form = MultipartForm::with(
            &[("campaign_name", "c"), ("thumbnail_option", "poster")],
            vec![("video_file", video_file())],
        );
        assert!(parse_upload_form(form).is_err());
    }
}
