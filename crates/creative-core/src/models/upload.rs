use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::AppError;

/// Moderation state of a published creative (matches database enum)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "upload_status", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    #[default]
    Active,
    Banned,
    Limited,
}

/// How the thumbnail of an upload was produced (matches database enum)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "thumbnail_type", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum ThumbnailType {
    #[default]
    None,
    FirstFrame,
    CustomModal,
}

impl ThumbnailType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThumbnailType::None => "none",
            ThumbnailType::FirstFrame => "first_frame",
            ThumbnailType::CustomModal => "custom_modal",
        }
    }
}

impl fmt::Display for ThumbnailType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThumbnailType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "none" => Ok(ThumbnailType::None),
            "first_frame" => Ok(ThumbnailType::FirstFrame),
            "custom_modal" => Ok(ThumbnailType::CustomModal),
            other => Err(AppError::InvalidInput(format!(
                "Invalid thumbnail_option '{}'. Expected none, first_frame or custom_modal",
                other
            ))),
        }
    }
}

impl FromStr for UploadStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(UploadStatus::Active),
            "banned" => Ok(UploadStatus::Banned),
            "limited" => Ok(UploadStatus::Limited),
            other => Err(AppError::InvalidInput(format!(
                "Invalid status '{}'. Expected active, banned or limited",
                other
            ))),
        }
    }
}

/// A video published to YouTube
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Upload {
    pub id: Uuid,
    pub template_id: Option<Uuid>,
    pub youtube_url: String,
    pub video_title: String,
    pub campaign_name: String,
    pub thumbnail_type: ThumbnailType,
    /// Modal id or storage key of the generated thumbnail
    pub thumbnail_ref: Option<String>,
    pub status: UploadStatus,
    pub ad_group: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub metrics: Option<serde_json::Value>,
    pub upload_date: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Values for inserting an upload row
#[derive(Debug, Clone)]
pub struct NewUpload {
    pub id: Uuid,
    pub template_id: Option<Uuid>,
    pub youtube_url: String,
    pub video_title: String,
    pub campaign_name: String,
    pub thumbnail_type: ThumbnailType,
    pub thumbnail_ref: Option<String>,
    pub ad_group: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadListResponse {
    pub uploads: Vec<Upload>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateUploadStatusRequest {
    pub status: UploadStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thumbnail_type_parsing() {
        assert_eq!(
            "first_frame".parse::<ThumbnailType>().unwrap(),
            ThumbnailType::FirstFrame
        );
        assert_eq!(
            " Custom_Modal ".parse::<ThumbnailType>().unwrap(),
            ThumbnailType::CustomModal
        );
        assert_eq!("".parse::<ThumbnailType>().unwrap(), ThumbnailType::None);
        assert!("middle_frame".parse::<ThumbnailType>().is_err());
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_value(UploadStatus::Banned).unwrap(),
            serde_json::json!("banned")
        );
        let req: UpdateUploadStatusRequest =
            serde_json::from_value(serde_json::json!({"status": "limited"})).unwrap();
        assert_eq!(req.status, UploadStatus::Limited);
        assert!("paused".parse::<UploadStatus>().is_err());
    }
}
