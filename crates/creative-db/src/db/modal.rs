use creative_core::{models::ModalImage, AppError};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// Repository for modal overlay images
#[derive(Clone)]
pub struct ModalImageRepository {
    pool: PgPool,
}

impl ModalImageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self), fields(db.table = "modal_images", db.operation = "insert"))]
    pub async fn create_modal(
        &self,
        id: Uuid,
        filename: &str,
        file_path: &str,
        file_size: i64,
    ) -> Result<ModalImage, AppError> {
        let modal = sqlx::query_as::<Postgres, ModalImage>(
            r#"
            INSERT INTO modal_images (id, filename, file_path, file_size, is_active)
            VALUES ($1, $2, $3, $4, TRUE)
            RETURNING id, filename, file_path, file_size, is_active, created_at
            "#,
        )
        .bind(id)
        .bind(filename)
        .bind(file_path)
        .bind(file_size)
        .fetch_one(&self.pool)
        .await?;

        Ok(modal)
    }

    /// Newest first
    #[tracing::instrument(skip(self), fields(db.table = "modal_images", db.operation = "select"))]
    pub async fn list_modals(&self) -> Result<Vec<ModalImage>, AppError> {
        let modals = sqlx::query_as::<Postgres, ModalImage>(
            "SELECT id, filename, file_path, file_size, is_active, created_at FROM modal_images ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(modals)
    }

    #[tracing::instrument(skip(self), fields(db.table = "modal_images", db.operation = "select", db.record_id = %id))]
    pub async fn get_modal(&self, id: Uuid) -> Result<Option<ModalImage>, AppError> {
        let modal = sqlx::query_as::<Postgres, ModalImage>(
            "SELECT id, filename, file_path, file_size, is_active, created_at FROM modal_images WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(modal)
    }

    /// Returns the deleted row so the caller can remove the stored file
    #[tracing::instrument(skip(self), fields(db.table = "modal_images", db.operation = "delete", db.record_id = %id))]
    pub async fn delete_modal(&self, id: Uuid) -> Result<Option<ModalImage>, AppError> {
        let modal = sqlx::query_as::<Postgres, ModalImage>(
            r#"
            DELETE FROM modal_images WHERE id = $1
            RETURNING id, filename, file_path, file_size, is_active, created_at
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(modal)
    }
}
