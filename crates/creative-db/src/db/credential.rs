use async_trait::async_trait;
use creative_core::{models::OAuthCredential, AppError};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use super::store::CredentialStore;

/// Repository for per-service integration credentials
#[derive(Clone)]
pub struct OAuthCredentialRepository {
    pool: PgPool,
}

impl OAuthCredentialRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Upsert keyed on `service`: one row per service, last write wins
    #[tracing::instrument(skip(self, credentials), fields(db.table = "oauth_credentials", db.operation = "upsert"))]
    pub async fn save(
        &self,
        service: &str,
        credentials: serde_json::Value,
    ) -> Result<OAuthCredential, AppError> {
        let row = sqlx::query_as::<Postgres, OAuthCredential>(
            r#"
            INSERT INTO oauth_credentials (id, service, credentials)
            VALUES ($1, $2, $3)
            ON CONFLICT (service)
            DO UPDATE SET credentials = EXCLUDED.credentials, updated_at = NOW()
            RETURNING id, service, credentials, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(service)
        .bind(credentials)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    #[tracing::instrument(skip(self), fields(db.table = "oauth_credentials", db.operation = "select"))]
    pub async fn get_by_service(&self, service: &str) -> Result<Option<OAuthCredential>, AppError> {
        let row = sqlx::query_as::<Postgres, OAuthCredential>(
            "SELECT id, service, credentials, created_at, updated_at FROM oauth_credentials WHERE service = $1",
        )
        .bind(service)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }
}

#[async_trait]
impl CredentialStore for OAuthCredentialRepository {
    async fn get_credentials(
        &self,
        service: &str,
    ) -> Result<Option<serde_json::Value>, AppError> {
        Ok(self.get_by_service(service).await?.map(|row| row.credentials))
    }

    async fn save_credentials(
        &self,
        service: &str,
        credentials: serde_json::Value,
    ) -> Result<(), AppError> {
        self.save(service, credentials).await.map(|_| ())
    }
}
