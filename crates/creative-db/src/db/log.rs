use async_trait::async_trait;
use creative_core::{models::LogEntry, AppError};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use super::store::ActivityLog;

const MAX_RECENT_LOGS: i64 = 500;

/// Repository for the business audit log
#[derive(Clone)]
pub struct LogRepository {
    pool: PgPool,
}

impl LogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self, metadata), fields(db.table = "logs", db.operation = "insert"))]
    pub async fn create_log(
        &self,
        action: &str,
        metadata: serde_json::Value,
        user_id: Option<Uuid>,
    ) -> Result<LogEntry, AppError> {
        let entry = sqlx::query_as::<Postgres, LogEntry>(
            r#"
            INSERT INTO logs (id, action, metadata, user_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, action, metadata, user_id, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(action)
        .bind(metadata)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(entry)
    }

    /// Newest first, capped at 500 rows
    #[tracing::instrument(skip(self), fields(db.table = "logs", db.operation = "select"))]
    pub async fn list_recent(&self, limit: i64) -> Result<Vec<LogEntry>, AppError> {
        let entries = sqlx::query_as::<Postgres, LogEntry>(
            "SELECT id, action, metadata, user_id, created_at FROM logs ORDER BY created_at DESC LIMIT $1",
        )
        .bind(limit.clamp(1, MAX_RECENT_LOGS))
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// Write a log row, swallowing failures. Used on error paths where the
    /// original error must win.
    pub async fn record_best_effort(&self, action: &str, metadata: serde_json::Value) {
        if let Err(e) = self.create_log(action, metadata, None).await {
            tracing::warn!(error = %e, action = %action, "Failed to write log entry");
        }
    }
}

#[async_trait]
impl ActivityLog for LogRepository {
    async fn record(&self, action: &str, metadata: serde_json::Value) -> Result<(), AppError> {
        self.create_log(action, metadata, None).await.map(|_| ())
    }
}
