pub mod batch_upload;
pub mod integrations;
pub mod modals;
pub mod root;
pub mod templates;
pub mod uploads;
pub mod video_upload;

use crate::error::HttpAppError;
use creative_db::LogRepository;
use serde_json::json;

/// Write `<operation>_error` to the audit log when `result` failed, then pass it through.
pub(crate) async fn audited<T>(
    log: &LogRepository,
    operation: &str,
    result: Result<T, HttpAppError>,
) -> Result<T, HttpAppError> {
    if let Err(HttpAppError(error)) = &result {
        log.record_best_effort(
            &format!("{}_error", operation),
            json!({ "error": error.to_string() }),
        )
        .await;
    }
    result
}
