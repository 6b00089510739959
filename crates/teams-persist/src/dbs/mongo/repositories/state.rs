use futures::TryStreamExt;
use bson::doc;
use mongodb::{Client, Collection};

use crate::dbs::mongo::models::MongoStateDocument;
use crate::error::Result;

#[derive(Clone)]
pub struct MongoStateRepository {
    collection: Collection<MongoStateDocument>,
}

impl MongoStateRepository {
    pub fn new(client: &Client, db_name: &str, collection: &str) -> Self {
        let collection = client.database(db_name).collection(collection);
        Self { collection }
    }

    /// Fetch the documents stored under `keys`
    pub async fn find_many(&self, keys: &[String]) -> Result<Vec<MongoStateDocument>> {
        let filter = doc! { "_id": { "$in": keys.to_vec() } };
        let documents = self.collection.find(filter).await?.try_collect().await?;
        Ok(documents)
    }

    /// Insert or replace a document
    pub async fn upsert(&self, document: &MongoStateDocument) -> Result<()> {
        let filter = doc! { "_id": document.key.as_str() };
        self.collection
            .replace_one(filter, document)
            .upsert(true)
            .await?;
        Ok(())
    }

    /// Delete the documents stored under `keys`
    pub async fn delete_many(&self, keys: &[String]) -> Result<u64> {
        let filter = doc! { "_id": { "$in": keys.to_vec() } };
        let result = self.collection.delete_many(filter).await?;
        Ok(result.deleted_count)
    }
}
