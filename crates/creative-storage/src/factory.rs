use crate::{LocalStorage, Storage, StorageResult};
use creative_core::Config;
use std::sync::Arc;

/// Create the storage backend described by the configuration
pub async fn create_storage(config: &Config) -> StorageResult<Arc<dyn Storage>> {
    let storage =
        LocalStorage::new(config.upload_dir(), config.public_base_url().to_string()).await?;
    Ok(Arc::new(storage))
}
