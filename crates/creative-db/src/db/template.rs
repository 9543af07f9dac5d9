use creative_core::{
    models::{CreateTemplateRequest, Template},
    AppError,
};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// Repository for creative templates
#[derive(Clone)]
pub struct TemplateRepository {
    pool: PgPool,
}

impl TemplateRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self, request), fields(db.table = "templates", db.operation = "insert"))]
    pub async fn create_template(
        &self,
        request: CreateTemplateRequest,
    ) -> Result<Template, AppError> {
        let template = sqlx::query_as::<Postgres, Template>(
            r#"
            INSERT INTO templates (id, language, style, background, aggressiveness, category, characteristics)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, language, style, background, aggressiveness, category, characteristics, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(request.language)
        .bind(request.style)
        .bind(request.background)
        .bind(request.aggressiveness)
        .bind(request.category)
        .bind(request.characteristics)
        .fetch_one(&self.pool)
        .await?;

        Ok(template)
    }

    /// Newest first
    #[tracing::instrument(skip(self), fields(db.table = "templates", db.operation = "select"))]
    pub async fn list_templates(&self) -> Result<Vec<Template>, AppError> {
        let templates = sqlx::query_as::<Postgres, Template>(
            "SELECT id, language, style, background, aggressiveness, category, characteristics, created_at FROM templates ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(templates)
    }

    #[tracing::instrument(skip(self), fields(db.table = "templates", db.operation = "select", db.record_id = %id))]
    pub async fn get_template(&self, id: Uuid) -> Result<Option<Template>, AppError> {
        let template = sqlx::query_as::<Postgres, Template>(
            "SELECT id, language, style, background, aggressiveness, category, characteristics, created_at FROM templates WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(template)
    }
}
