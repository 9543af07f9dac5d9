//! Storage setup and initialization

use anyhow::{Context, Result};
use creative_core::Config;
use creative_storage::{create_storage, Storage};
use std::sync::Arc;

pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    tracing::info!(upload_dir = %config.upload_dir(), "Initializing local storage...");
    let storage = create_storage(config)
        .await
        .context("Failed to initialize storage")?;
    storage
        .health_check()
        .await
        .context("Storage directory is not writable")?;
    tracing::info!(
        public_base_url = %config.public_base_url(),
        "Storage initialized successfully"
    );
    Ok(storage)
}
