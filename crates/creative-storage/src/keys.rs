//! Shared key generation for storage backends.

use uuid::Uuid;

/// `videos/{upload_id}/{filename}`
pub fn video_key(upload_id: Uuid, filename: &str) -> String {
    format!("videos/{}/{}", upload_id, filename)
}

/// `thumbnails/{upload_id}.jpg`
pub fn thumbnail_key(upload_id: Uuid) -> String {
    format!("thumbnails/{}.jpg", upload_id)
}

/// `modals/{modal_id}_{filename}`
pub fn modal_key(modal_id: Uuid, filename: &str) -> String {
    format!("modals/{}_{}", modal_id, filename)
}
