use super::audited;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::DbState;
use axum::{
    extract::{Path, State},
    Json,
};
use creative_core::models::{
    SuccessResponse, UpdateUploadStatusRequest, Upload, UploadListResponse,
};
use creative_core::AppError;
use serde_json::{json, Value};
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/uploads",
    tag = "uploads",
    responses(
        (status = 200, description = "Uploads, newest first", body = UploadListResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_uploads(
    State(db): State<DbState>,
) -> Result<Json<UploadListResponse>, HttpAppError> {
    let result = db
        .upload_repository
        .list_uploads()
        .await
        .map_err(HttpAppError::from);
    let uploads = audited(&db.log_repository, "list_uploads", result).await?;
    Ok(Json(UploadListResponse { uploads }))
}

#[utoipa::path(
    get,
    path = "/uploads/{id}",
    tag = "uploads",
    params(("id" = Uuid, Path, description = "Upload ID")),
    responses(
        (status = 200, description = "Upload found", body = Upload),
        (status = 404, description = "Upload not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(db), fields(upload_id = %id, operation = "get_upload"))]
pub async fn get_upload(
    Path(id): Path<Uuid>,
    State(db): State<DbState>,
) -> Result<Json<Upload>, HttpAppError> {
    let result: Result<Upload, HttpAppError> = async {
        Ok(db
            .upload_repository
            .get_upload(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Upload not found".to_string()))?)
    }
    .await;
    audited(&db.log_repository, "get_upload", result).await.map(Json)
}

/// Moderation state change. Unknown ids answer `{success: false}` rather than 404.
#[utoipa::path(
    put,
    path = "/uploads/{id}/status",
    tag = "uploads",
    params(("id" = Uuid, Path, description = "Upload ID")),
    request_body = UpdateUploadStatusRequest,
    responses(
        (status = 200, description = "`success` tells whether a row was updated", body = SuccessResponse),
        (status = 400, description = "Invalid status", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(db, request), fields(upload_id = %id, operation = "update_upload_status"))]
pub async fn update_upload_status(
    Path(id): Path<Uuid>,
    State(db): State<DbState>,
    ValidatedJson(request): ValidatedJson<UpdateUploadStatusRequest>,
) -> Result<Json<SuccessResponse>, HttpAppError> {
    let result = db
        .upload_repository
        .update_status(id, request.status)
        .await
        .map_err(HttpAppError::from);
    let updated = audited(&db.log_repository, "update_upload_status", result).await?;

    if updated {
        db.log_repository
            .record_best_effort(
                "upload_status_updated",
                json!({ "upload_id": id, "status": request.status }),
            )
            .await;
    }
    Ok(Json(SuccessResponse { success: updated }))
}

/// Replace the metrics blob of an upload with the posted JSON object
#[utoipa::path(
    put,
    path = "/uploads/{id}/performance",
    tag = "uploads",
    params(("id" = Uuid, Path, description = "Upload ID")),
    request_body(content = Object, description = "Arbitrary performance metrics"),
    responses(
        (status = 200, description = "`success` tells whether a row was updated", body = SuccessResponse),
        (status = 400, description = "Body is not a JSON object", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(db, metrics), fields(upload_id = %id, operation = "update_upload_performance"))]
pub async fn update_upload_performance(
    Path(id): Path<Uuid>,
    State(db): State<DbState>,
    ValidatedJson(metrics): ValidatedJson<Value>,
) -> Result<Json<SuccessResponse>, HttpAppError> {
    let result: Result<bool, HttpAppError> = async {
        if !metrics.is_object() {
            return Err(AppError::InvalidInput(
                "Performance metrics must be a JSON object".to_string(),
            )
            .into());
        }
        Ok(db.upload_repository.update_performance(id, metrics).await?)
    }
    .await;
    let updated = audited(&db.log_repository, "update_upload_performance", result).await?;
    Ok(Json(SuccessResponse { success: updated }))
}
