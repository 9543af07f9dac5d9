//! Storage-agnostic access to credentials and the audit log.

use async_trait::async_trait;
use creative_core::AppError;

/// Per-service credential blobs, keyed by service name
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Latest credentials for `service`, if any were saved
    async fn get_credentials(&self, service: &str)
        -> Result<Option<serde_json::Value>, AppError>;

    /// Replace the credentials for `service` (last write wins)
    async fn save_credentials(
        &self,
        service: &str,
        credentials: serde_json::Value,
    ) -> Result<(), AppError>;
}

/// Append-only business audit log
#[async_trait]
pub trait ActivityLog: Send + Sync {
    async fn record(&self, action: &str, metadata: serde_json::Value) -> Result<(), AppError>;
}
