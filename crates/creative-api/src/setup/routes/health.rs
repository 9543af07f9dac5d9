//! Health check handlers and response types.

use crate::state::AppState;
use axum::{http::StatusCode, response::IntoResponse, Json};
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(5);

/// Run an async check with timeout; returns "healthy", "timeout", or "{prefix}: {error}".
async fn run_check<F, E>(timeout: Duration, f: F, error_prefix: &str) -> String
where
    F: Future<Output = Result<(), E>>,
    E: Display,
{
    match tokio::time::timeout(timeout, f).await {
        Ok(Ok(())) => "healthy".to_string(),
        Ok(Err(e)) => format!("{}: {}", error_prefix, e),
        Err(_) => "timeout".to_string(),
    }
}

#[derive(serde::Serialize)]
pub(super) struct HealthCheckResponse {
    pub status: String,
    pub database: String,
    pub storage: String,
    pub ffmpeg: String,
}

/// Liveness probe - process is running.
pub async fn liveness_check(_state: Arc<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "status": "alive" })),
    )
}

/// Readiness probe - the database answers.
pub async fn readiness_check(state: Arc<AppState>) -> impl IntoResponse {
    let pool = state.db.pool.clone();
    let database = run_check(
        TIMEOUT,
        async move { sqlx::query("SELECT 1").execute(&pool).await.map(drop) },
        "not_ready",
    )
    .await;

    if database == "healthy" {
        (
            StatusCode::OK,
            Json(serde_json::json!({ "status": "ready", "database": "ready" })),
        )
    } else {
        tracing::error!(database = %database, "Database readiness check failed");
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({ "status": "not_ready", "database": database })),
        )
    }
}

/// Full health check. The database is critical; storage and ffmpeg only degrade the status.
pub async fn health_check(state: Arc<AppState>) -> impl IntoResponse {
    let pool = state.db.pool.clone();
    let database = run_check(
        TIMEOUT,
        async move { sqlx::query("SELECT 1").execute(&pool).await.map(drop) },
        "unhealthy",
    )
    .await;

    let storage = state.media.storage.clone();
    let storage = run_check(TIMEOUT, async move { storage.health_check().await }, "degraded").await;

    let ffmpeg = state.media.ffmpeg.clone();
    let ffmpeg = run_check(TIMEOUT, async move { ffmpeg.check_available().await }, "unavailable").await;

    let (status_code, status) = if database != "healthy" {
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
    } else if storage != "healthy" || ffmpeg != "healthy" {
        (StatusCode::OK, "degraded")
    } else {
        (StatusCode::OK, "healthy")
    };

    (
        status_code,
        Json(HealthCheckResponse {
            status: status.to_string(),
            database,
            storage,
            ffmpeg,
        }),
    )
}
