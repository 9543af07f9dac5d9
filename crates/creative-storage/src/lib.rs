//! Creative Storage Library
//!
//! Storage abstraction for uploaded videos, modal overlays and generated thumbnails,
//! with a local filesystem backend served under `/files`.
//!
//! # Storage key format
//!
//! - **Source videos**: `videos/{upload_id}/{filename}`
//! - **Thumbnails**: `thumbnails/{upload_id}.jpg`
//! - **Modal overlays**: `modals/{modal_id}_{filename}`
//!
//! Keys must not contain `..` or a leading `/`. Key generation lives in the `keys` module.

pub mod factory;
pub mod keys;
pub mod local;
pub mod traits;

pub use factory::create_storage;
pub use local::LocalStorage;
pub use traits::{Storage, StorageError, StorageResult};
