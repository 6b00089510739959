use std::collections::HashMap;
use std::future::Future;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::{Result, StorageError};

/// Items exchanged with a storage provider, keyed by storage key.
pub type StoreItems = HashMap<String, serde_json::Value>;

/// Trait for key-value storage providers backing turn state
///
/// Implementations decide where items live (memory, MongoDB, ...). Keys that
/// are not present are simply missing from the map returned by `read`.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Read the items stored under `keys`
    async fn read(&self, keys: &[String], cancel: &CancellationToken) -> Result<StoreItems>;

    /// Insert or overwrite every item in `changes`
    async fn write(&self, changes: StoreItems, cancel: &CancellationToken) -> Result<()>;

    /// Remove the items stored under `keys`; unknown keys are ignored
    async fn delete(&self, keys: &[String], cancel: &CancellationToken) -> Result<()>;
}

/// Drive `operation` to completion unless `cancel` fires first.
pub async fn run_cancellable<T, F>(cancel: &CancellationToken, operation: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    if cancel.is_cancelled() {
        return Err(StorageError::Cancelled);
    }
    tokio::select! {
        _ = cancel.cancelled() => Err(StorageError::Cancelled),
        result = operation => result,
    }
}
