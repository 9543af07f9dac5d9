//! Creative API Library
//!
//! HTTP handlers, the upload pipeline and application setup of the UAC Creative Manager.

mod api_doc;
mod handlers;
mod telemetry;
mod utils;

pub mod error;
pub mod services;
pub mod setup;
pub mod state;

pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
