//! Creative Core Library
//!
//! Domain models, error types and configuration shared by every crate of the
//! creative manager backend.

pub mod config;
pub mod error;
pub mod models;

pub use config::{BaseConfig, Config, CreativeConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
