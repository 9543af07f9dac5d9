//! Data models for the application
//!
//! Rows mirrored from Postgres plus the request/response DTOs of the HTTP surface,
//! grouped by feature area.

mod credential;
mod integration;
mod log;
mod modal;
mod role;
mod template;
mod upload;
mod video;

pub use credential::*;
pub use integration::*;
pub use log::*;
pub use modal::*;
pub use role::*;
pub use template::*;
pub use upload::*;
pub use video::*;

use serde::Serialize;
use utoipa::ToSchema;

/// Plain `{success}` acknowledgement returned by mutating endpoints
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        SuccessResponse { success: true }
    }
}
