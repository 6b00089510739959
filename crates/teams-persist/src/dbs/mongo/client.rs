use async_trait::async_trait;
use mongodb::Client;
use tokio_util::sync::CancellationToken;

use crate::dbs::mongo::models::MongoStateDocument;
use crate::dbs::mongo::repositories::MongoStateRepository;
use crate::error::{Result, StorageError};
use crate::storage::{run_cancellable, Storage, StoreItems};

/// Collection used when none is configured
pub const DEFAULT_COLLECTION: &str = "turn_state";

/// [`Storage`] persisting one MongoDB document per storage key
pub struct MongoStorage {
    repo: MongoStateRepository,
}

impl MongoStorage {
    /// Connect to MongoDB and create the storage
    pub async fn connect(mongodb_uri: &str, database: &str, collection: &str) -> Result<Self> {
        let client = Client::with_uri_str(mongodb_uri)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(Self {
            repo: MongoStateRepository::new(&client, database, collection),
        })
    }

    pub fn from_repository(repo: MongoStateRepository) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl Storage for MongoStorage {
    async fn read(&self, keys: &[String], cancel: &CancellationToken) -> Result<StoreItems> {
        if keys.is_empty() {
            return Ok(StoreItems::new());
        }
        let documents = run_cancellable(cancel, self.repo.find_many(keys)).await?;
        Ok(documents.into_iter().map(|d| (d.key, d.value)).collect())
    }

    async fn write(&self, changes: StoreItems, cancel: &CancellationToken) -> Result<()> {
        let documents: Vec<MongoStateDocument> = changes
            .into_iter()
            .map(|(key, value)| MongoStateDocument::new(key, value))
            .collect();

        run_cancellable(cancel, async {
            for document in &documents {
                self.repo.upsert(document).await?;
            }
            Ok(())
        })
        .await
    }

    async fn delete(&self, keys: &[String], cancel: &CancellationToken) -> Result<()> {
        if keys.is_empty() {
            return Ok(());
        }
        let deleted = run_cancellable(cancel, self.repo.delete_many(keys)).await?;
        tracing::debug!("Deleted {} state documents", deleted);
        Ok(())
    }
}
