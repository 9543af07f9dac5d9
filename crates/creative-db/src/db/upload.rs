use creative_core::{
    models::{NewUpload, Upload, UploadStatus},
    AppError,
};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

const UPLOAD_COLUMNS: &str = "id, template_id, youtube_url, video_title, campaign_name, thumbnail_type, thumbnail_ref, status, ad_group, metrics, upload_date, updated_at";

/// Repository for published videos
#[derive(Clone)]
pub struct UploadRepository {
    pool: PgPool,
}

impl UploadRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert an upload with status `active`
    #[tracing::instrument(skip(self, upload), fields(db.table = "uploads", db.operation = "insert", db.record_id = %upload.id))]
    pub async fn create_upload(&self, upload: NewUpload) -> Result<Upload, AppError> {
        let query = format!(
            r#"
            INSERT INTO uploads (id, template_id, youtube_url, video_title, campaign_name, thumbnail_type, thumbnail_ref, status, ad_group)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            UPLOAD_COLUMNS
        );
        let row = sqlx::query_as::<Postgres, Upload>(&query)
            .bind(upload.id)
            .bind(upload.template_id)
            .bind(&upload.youtube_url)
            .bind(&upload.video_title)
            .bind(&upload.campaign_name)
            .bind(upload.thumbnail_type)
            .bind(&upload.thumbnail_ref)
            .bind(UploadStatus::Active)
            .bind(&upload.ad_group)
            .fetch_one(&self.pool)
            .await?;

        Ok(row)
    }

    /// Newest `upload_date` first
    #[tracing::instrument(skip(self), fields(db.table = "uploads", db.operation = "select"))]
    pub async fn list_uploads(&self) -> Result<Vec<Upload>, AppError> {
        let query = format!(
            "SELECT {} FROM uploads ORDER BY upload_date DESC",
            UPLOAD_COLUMNS
        );
        let uploads = sqlx::query_as::<Postgres, Upload>(&query)
            .fetch_all(&self.pool)
            .await?;

        Ok(uploads)
    }

    #[tracing::instrument(skip(self), fields(db.table = "uploads", db.operation = "select", db.record_id = %id))]
    pub async fn get_upload(&self, id: Uuid) -> Result<Option<Upload>, AppError> {
        let query = format!("SELECT {} FROM uploads WHERE id = $1", UPLOAD_COLUMNS);
        let upload = sqlx::query_as::<Postgres, Upload>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(upload)
    }

    /// Returns `false` when no upload has this id
    #[tracing::instrument(skip(self), fields(db.table = "uploads", db.operation = "update", db.record_id = %id))]
    pub async fn update_status(&self, id: Uuid, status: UploadStatus) -> Result<bool, AppError> {
        let result =
            sqlx::query("UPDATE uploads SET status = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(status)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Replace the performance metrics blob. Returns `false` when no upload has this id.
    #[tracing::instrument(skip(self, metrics), fields(db.table = "uploads", db.operation = "update", db.record_id = %id))]
    pub async fn update_performance(
        &self,
        id: Uuid,
        metrics: serde_json::Value,
    ) -> Result<bool, AppError> {
        let result =
            sqlx::query("UPDATE uploads SET metrics = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(metrics)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }
}
