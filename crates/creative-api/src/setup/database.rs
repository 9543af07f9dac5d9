//! Database setup and initialization

use crate::state::DbState;
use anyhow::{Context, Result};
use creative_core::Config;
use serde_json::json;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::path::Path;
use std::time::Duration;

/// Setup database connection pool and run migrations
pub async fn setup_database(config: &Config) -> Result<PgPool> {
    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections())
        .acquire_timeout(Duration::from_secs(config.db_timeout_seconds()))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .connect(config.database_url())
        .await
        .context("Failed to connect to database")?;

    tracing::info!(
        max_connections = config.db_max_connections(),
        "Database connected successfully"
    );

    let migrations_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../migrations");
    let migrator = sqlx::migrate::Migrator::new(migrations_dir)
        .await
        .context("Failed to load migrations")?;
    migrator
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database migrations applied");

    Ok(pool)
}

/// Ensure the default roles exist and write the `database_initialized` audit row.
pub async fn record_startup(db: &DbState) {
    let created = match db.role_repository.ensure_default_roles().await {
        Ok(created) => created,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to ensure default roles");
            return;
        }
    };

    let roles_count = match db.role_repository.list_roles().await {
        Ok(roles) => roles.len(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to list roles");
            0
        }
    };

    tracing::info!(created, roles_count, "Default roles ensured");
    db.log_repository
        .record_best_effort(
            "database_initialized",
            json!({
                "message": "Database initialized successfully",
                "roles_count": roles_count,
            }),
        )
        .await;
}
