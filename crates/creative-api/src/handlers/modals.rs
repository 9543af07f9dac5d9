//! Modal overlays: upload, list, preview and delete.

use super::audited;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::{DbState, MediaState};
use crate::utils::upload::{sanitize_filename, MultipartForm};
use axum::{
    extract::{Multipart, Path, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use creative_core::models::{
    ModalImageResponse, ModalListResponse, ModalUploadResponse, PreviewQuery, SuccessResponse,
};
use creative_core::AppError;
use creative_processing::image::decode_image;
use creative_processing::{render_preview, PreviewSize};
use creative_storage::keys::modal_key;
use serde_json::json;
use uuid::Uuid;

#[utoipa::path(
    post,
    path = "/upload/modal",
    tag = "modals",
    request_body(content = inline(Object), description = "Multipart form with an `image` part", content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Modal stored", body = ModalUploadResponse),
        (status = 400, description = "Missing or invalid image", body = ErrorResponse),
        (status = 413, description = "Image too large", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all, fields(operation = "upload_modal"))]
pub async fn upload_modal(
    State(db): State<DbState>,
    State(media): State<MediaState>,
    multipart: Multipart,
) -> Result<Json<ModalUploadResponse>, HttpAppError> {
    let result = store_modal(&db, &media, multipart).await;
    audited(&db.log_repository, "modal_upload", result).await.map(Json)
}

async fn store_modal(
    db: &DbState,
    media: &MediaState,
    multipart: Multipart,
) -> Result<ModalUploadResponse, HttpAppError> {
    let mut form = MultipartForm::from_multipart(multipart).await?;
    let image = form
        .take_file("image")
        .ok_or_else(|| AppError::InvalidInput("image is required".to_string()))?;

    media
        .image_validator
        .validate_all(&image.filename, &image.content_type, image.data.len())?;
    decode_image(&image.data)
        .map_err(|e| AppError::InvalidInput(format!("image could not be decoded: {}", e)))?;

    let modal_id = Uuid::new_v4();
    let filename = sanitize_filename(&image.filename)?;
    let key = modal_key(modal_id, &filename);
    let file_size = image.data.len() as i64;

    media
        .storage
        .upload_with_key(&key, image.data.to_vec(), &image.content_type)
        .await?;

    let modal = match db
        .modal_repository
        .create_modal(modal_id, &filename, &key, file_size)
        .await
    {
        Ok(modal) => modal,
        Err(e) => {
            if let Err(cleanup) = media.storage.delete(&key).await {
                tracing::warn!(key = %key, error = %cleanup, "Failed to remove orphaned modal file");
            }
            return Err(e.into());
        }
    };

    db.log_repository
        .record_best_effort(
            "modal_uploaded",
            json!({ "modal_id": modal.id, "filename": modal.filename, "file_size": file_size }),
        )
        .await;
    tracing::info!(modal_id = %modal.id, "Modal image uploaded");

    Ok(ModalUploadResponse {
        success: true,
        modal_id: modal.id,
        filename: modal.filename,
    })
}

#[utoipa::path(
    get,
    path = "/modals",
    tag = "modals",
    responses(
        (status = 200, description = "Modal images, newest first", body = ModalListResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_modals(
    State(db): State<DbState>,
) -> Result<Json<ModalListResponse>, HttpAppError> {
    let result = db
        .modal_repository
        .list_modals()
        .await
        .map_err(HttpAppError::from);
    let modals = audited(&db.log_repository, "list_modals", result).await?;

    Ok(Json(ModalListResponse {
        modals: modals.into_iter().map(ModalImageResponse::from).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/modals/{id}/preview",
    tag = "modals",
    params(
        ("id" = Uuid, Path, description = "Modal image ID"),
        PreviewQuery
    ),
    responses(
        (status = 200, description = "PNG preview of the modal on a neutral canvas", content_type = "image/png"),
        (status = 404, description = "Modal image not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(db, media), fields(modal_id = %id, operation = "preview_modal"))]
pub async fn preview_modal(
    Path(id): Path<Uuid>,
    Query(query): Query<PreviewQuery>,
    State(db): State<DbState>,
    State(media): State<MediaState>,
) -> Result<impl IntoResponse, HttpAppError> {
    let result = render_modal_preview(&db, &media, id, query).await;
    let png = audited(&db.log_repository, "modal_preview", result).await?;
    Ok(([(header::CONTENT_TYPE, "image/png")], png))
}

async fn render_modal_preview(
    db: &DbState,
    media: &MediaState,
    id: Uuid,
    query: PreviewQuery,
) -> Result<Vec<u8>, HttpAppError> {
    let modal = db
        .modal_repository
        .get_modal(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Modal image not found".to_string()))?;
    let modal_png = media.storage.download(&modal.file_path).await?;
    let size = PreviewSize::from_query(query.width, query.height);

    let png = tokio::task::spawn_blocking(move || render_preview(&modal_png, size))
        .await
        .map_err(|e| AppError::Internal(format!("Preview task failed: {}", e)))?
        .map_err(|e| AppError::ImageProcessing(e.to_string()))?;
    Ok(png)
}

#[utoipa::path(
    delete,
    path = "/modals/{id}",
    tag = "modals",
    params(("id" = Uuid, Path, description = "Modal image ID")),
    responses(
        (status = 200, description = "Modal deleted", body = SuccessResponse),
        (status = 404, description = "Modal image not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(db, media), fields(modal_id = %id, operation = "delete_modal"))]
pub async fn delete_modal(
    Path(id): Path<Uuid>,
    State(db): State<DbState>,
    State(media): State<MediaState>,
) -> Result<Json<SuccessResponse>, HttpAppError> {
    let result: Result<SuccessResponse, HttpAppError> = async {
        let modal = db
            .modal_repository
            .delete_modal(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Modal image not found".to_string()))?;
        if let Err(e) = media.storage.delete(&modal.file_path).await {
            tracing::warn!(key = %modal.file_path, error = %e, "Failed to remove modal file");
        }
        db.log_repository
            .record_best_effort("modal_deleted", json!({ "modal_id": id }))
            .await;
        Ok(SuccessResponse::ok())
    }
    .await;
    audited(&db.log_repository, "modal_delete", result).await.map(Json)
}
