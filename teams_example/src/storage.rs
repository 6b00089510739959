use std::sync::Arc;

use anyhow::Result;
use teams_ai::{MemoryStorage, Storage};

use crate::config::{Config, StorageBackend};

/// Build the storage provider selected in config.
pub async fn build_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    match config.storage.backend {
        StorageBackend::Memory => {
            tracing::info!("Using in-memory storage");
            Ok(Arc::new(MemoryStorage::new()))
        }
        StorageBackend::Mongodb => connect_mongodb(config).await,
    }
}

#[cfg(feature = "mongodb")]
async fn connect_mongodb(config: &Config) -> Result<Arc<dyn Storage>> {
    let uri = config
        .mongodb_uri
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("MONGODB_URI is required for the mongodb backend"))?;

    tracing::info!(
        database = %config.storage.database,
        collection = %config.storage.collection,
        "Connecting to MongoDB"
    );
    let storage = teams_ai::MongoStorage::connect(
        uri,
        &config.storage.database,
        &config.storage.collection,
    )
    .await?;
    Ok(Arc::new(storage))
}

#[cfg(not(feature = "mongodb"))]
async fn connect_mongodb(_config: &Config) -> Result<Arc<dyn Storage>> {
    anyhow::bail!("mongodb backend requested but the `mongodb` feature is not enabled")
}
