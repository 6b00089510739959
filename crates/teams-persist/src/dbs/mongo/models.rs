use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One stored state item; the storage key doubles as the document id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoStateDocument {
    #[serde(rename = "_id")]
    pub key: String,
    pub value: serde_json::Value,
    pub updated_at: DateTime<Utc>,
}

impl MongoStateDocument {
    pub fn new(key: String, value: serde_json::Value) -> Self {
        Self {
            key,
            value,
            updated_at: Utc::now(),
        }
    }
}
