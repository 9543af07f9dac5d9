use super::audited;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::DbState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use creative_core::models::{CreateTemplateRequest, Template, TemplateListResponse};
use creative_core::AppError;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

#[utoipa::path(
    get,
    path = "/templates",
    tag = "templates",
    responses(
        (status = 200, description = "All templates", body = TemplateListResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_templates(
    State(db): State<DbState>,
) -> Result<Json<TemplateListResponse>, HttpAppError> {
    let result = db
        .template_repository
        .list_templates()
        .await
        .map_err(HttpAppError::from);
    let templates = audited(&db.log_repository, "list_templates", result).await?;
    Ok(Json(TemplateListResponse { templates }))
}

#[utoipa::path(
    post,
    path = "/templates",
    tag = "templates",
    request_body = CreateTemplateRequest,
    responses(
        (status = 201, description = "Template created", body = Template),
        (status = 400, description = "Invalid template", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all, fields(operation = "create_template"))]
pub async fn create_template(
    State(db): State<DbState>,
    ValidatedJson(request): ValidatedJson<CreateTemplateRequest>,
) -> Result<(StatusCode, Json<Template>), HttpAppError> {
    let result: Result<Template, HttpAppError> = async {
        request.validate().map_err(AppError::from)?;
        Ok(db.template_repository.create_template(request).await?)
    }
    .await;
    let template = audited(&db.log_repository, "create_template", result).await?;

    db.log_repository
        .record_best_effort(
            "template_created",
            json!({ "template_id": template.id, "category": template.category }),
        )
        .await;
    Ok((StatusCode::CREATED, Json(template)))
}

#[utoipa::path(
    get,
    path = "/templates/{id}",
    tag = "templates",
    params(("id" = Uuid, Path, description = "Template ID")),
    responses(
        (status = 200, description = "Template found", body = Template),
        (status = 404, description = "Template not found", body = ErrorResponse)
    )
)]
pub async fn get_template(
    Path(id): Path<Uuid>,
    State(db): State<DbState>,
) -> Result<Json<Template>, HttpAppError> {
    let result: Result<Template, HttpAppError> = async {
        Ok(db
            .template_repository
            .get_template(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Template not found".to_string()))?)
    }
    .await;
    audited(&db.log_repository, "get_template", result).await.map(Json)
}
