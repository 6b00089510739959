//! In-memory storage provider, suitable for tests and single-process bots.

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use crate::error::{Result, StorageError};
use crate::storage::{Storage, StoreItems};

/// [`Storage`] backed by a `HashMap` behind an async `RwLock`.
///
/// Items are cloned in and out, so callers never share mutable state with the
/// store. Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RwLock<StoreItems>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `items`.
    pub fn with_items(items: StoreItems) -> Self {
        Self {
            items: RwLock::new(items),
        }
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }

    /// Copy of everything currently stored.
    pub async fn snapshot(&self) -> StoreItems {
        self.items.read().await.clone()
    }
}

fn ensure_active(cancel: &CancellationToken) -> Result<()> {
    if cancel.is_cancelled() {
        return Err(StorageError::Cancelled);
    }
    Ok(())
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn read(&self, keys: &[String], cancel: &CancellationToken) -> Result<StoreItems> {
        ensure_active(cancel)?;
        let items = self.items.read().await;
        let found = keys
            .iter()
            .filter_map(|key| items.get(key).map(|value| (key.clone(), value.clone())))
            .collect();
        Ok(found)
    }

    async fn write(&self, changes: StoreItems, cancel: &CancellationToken) -> Result<()> {
        ensure_active(cancel)?;
        if changes.is_empty() {
            return Ok(());
        }
        let mut items = self.items.write().await;
        for (key, value) in changes {
            tracing::trace!(key = %key, "memory storage write");
            items.insert(key, value);
        }
        Ok(())
    }

    async fn delete(&self, keys: &[String], cancel: &CancellationToken) -> Result<()> {
        ensure_active(cancel)?;
        let mut items = self.items.write().await;
        for key in keys {
            items.remove(key);
        }
        Ok(())
    }
}
