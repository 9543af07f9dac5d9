use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Creative brief describing how an ad should look and sound
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Template {
    pub id: Uuid,
    pub language: Option<String>,
    pub style: Option<String>,
    pub background: Option<String>,
    pub aggressiveness: Option<String>,
    pub category: Option<String>,
    pub characteristics: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TemplateListResponse {
    pub templates: Vec<Template>,
}

/// Request DTO for creating a template
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateTemplateRequest {
    #[validate(length(max = 64, message = "Language must be at most 64 characters"))]
    pub language: Option<String>,
    #[validate(length(max = 255, message = "Style must be at most 255 characters"))]
    pub style: Option<String>,
    #[validate(length(max = 255, message = "Background must be at most 255 characters"))]
    pub background: Option<String>,
    #[validate(length(max = 64, message = "Aggressiveness must be at most 64 characters"))]
    pub aggressiveness: Option<String>,
    #[validate(length(
        min = 1,
        max = 255,
        message = "Category must be between 1 and 255 characters"
    ))]
    pub category: Option<String>,
    #[serde(default)]
    pub characteristics: Vec<String>,
}
