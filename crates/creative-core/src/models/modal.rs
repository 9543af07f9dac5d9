use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// PNG overlay stored for custom thumbnails
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ModalImage {
    pub id: Uuid,
    pub filename: String,
    /// Storage key of the PNG
    pub file_path: String,
    pub file_size: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ModalImageResponse {
    pub id: Uuid,
    pub filename: String,
    pub upload_date: DateTime<Utc>,
}

impl From<ModalImage> for ModalImageResponse {
    fn from(modal: ModalImage) -> Self {
        ModalImageResponse {
            id: modal.id,
            filename: modal.filename,
            upload_date: modal.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ModalListResponse {
    pub modals: Vec<ModalImageResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ModalUploadResponse {
    pub success: bool,
    pub modal_id: Uuid,
    pub filename: String,
}

/// Canvas size for `GET /modals/{id}/preview`
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct PreviewQuery {
    pub width: Option<u32>,
    pub height: Option<u32>,
}
