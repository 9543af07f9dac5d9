//! `POST /upload/batch`: several local files through the upload pipeline, one after another.

use super::audited;
use crate::error::{ErrorResponse, HttpAppError};
use crate::services::{BatchUploadRequest, UploadPipeline};
use crate::state::AppState;
use crate::utils::upload::MultipartForm;
use axum::{
    extract::{Multipart, State},
    Json,
};
use creative_core::models::{BatchUploadResponse, ThumbnailType};
use creative_core::AppError;
use std::sync::Arc;

fn parse_batch_form(
    mut form: MultipartForm,
    max_files: usize,
) -> Result<BatchUploadRequest, AppError> {
    let campaign_name = form.required_text("campaign_name")?.to_string();
    let thumbnail: ThumbnailType = form.text("thumbnail_option").unwrap_or_default().parse()?;
    let modal_image_id = form.uuid("modal_image_id")?;
    let template_id = form.uuid("template_id")?;
    let description = form.text("description").unwrap_or_default().to_string();
    let create_formats = form.flag("create_formats");

    if thumbnail == ThumbnailType::CustomModal && modal_image_id.is_none() {
        return Err(AppError::InvalidInput(
            "modal_image_id is required when thumbnail_option is custom_modal".to_string(),
        ));
    }

    let files = form.take_files("video_files");
    if files.is_empty() {
        return Err(AppError::InvalidInput(
            "At least one video_files part is required".to_string(),
        ));
    }
    if files.len() > max_files {
        return Err(AppError::InvalidInput(format!(
            "Too many files: {} (max {})",
            files.len(),
            max_files
        )));
    }

    Ok(BatchUploadRequest {
        campaign_name,
        files,
        thumbnail,
        modal_image_id,
        description,
        create_formats,
        template_id,
    })
}

#[utoipa::path(
    post,
    path = "/upload/batch",
    tag = "uploads",
    request_body(
        content = inline(Object),
        description = "Multipart form: campaign_name, thumbnail_option, modal_image_id, create_formats, template_id, description and one or more video_files parts",
        content_type = "multipart/form-data"
    ),
    responses(
        (status = 200, description = "Per-file results; failed items do not fail the batch", body = BatchUploadResponse),
        (status = 400, description = "Invalid form", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all, fields(operation = "upload_batch"))]
pub async fn upload_batch(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<BatchUploadResponse>, HttpAppError> {
    let result: Result<BatchUploadResponse, HttpAppError> = async {
        let form = MultipartForm::from_multipart(multipart).await?;
        let request = parse_batch_form(form, state.media.max_batch_files)?;
        Ok(UploadPipeline::new(&state).run_batch(request).await)
    }
    .await;
    let response = audited(&state.db.log_repository, "upload_batch", result).await?;

    tracing::info!(
        total = response.total,
        succeeded = response.succeeded,
        failed = response.failed,
        "Batch upload finished"
    );
    Ok(Json(response))
}
