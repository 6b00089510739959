use std::collections::BTreeMap;

use teams_persist::{Storage, StoreItems};
use teams_types::{Activity, TurnContext};
use tokio_util::sync::CancellationToken;

use crate::config::StateConfig;
use crate::entry::TurnStateEntry;
use crate::error::{Result, StateError};
use crate::path::Scope;
use crate::record::Record;
use crate::turn_state::TurnState;

/// Storage keys of the persisted scopes for one turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub conversation: String,
    pub user: String,
}

impl StorageKeys {
    /// `{channel}/{bot}/conversations/{conversation}` and
    /// `{channel}/{bot}/users/{user}`.
    pub fn from_activity(activity: &Activity) -> Result<Self> {
        let channel_id = activity
            .channel_id()
            .ok_or(StateError::MissingActivityField("channelId"))?;
        let bot_id = activity
            .recipient_id()
            .ok_or(StateError::MissingActivityField("recipient.id"))?;
        let conversation_id = activity
            .conversation_id()
            .ok_or(StateError::MissingActivityField("conversation.id"))?;
        let user_id = activity
            .from_id()
            .ok_or(StateError::MissingActivityField("from.id"))?;

        Ok(Self {
            conversation: format!("{channel_id}/{bot_id}/conversations/{conversation_id}"),
            user: format!("{channel_id}/{bot_id}/users/{user_id}"),
        })
    }

    pub fn for_scope(&self, scope: Scope) -> Option<&str> {
        match scope {
            Scope::Conversation => Some(self.conversation.as_str()),
            Scope::User => Some(self.user.as_str()),
            Scope::Temp => None,
        }
    }
}

/// Keys written and deleted by a save.
///
/// Without a storage provider these are the keys that would have been touched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveSummary {
    pub written: Vec<String>,
    pub deleted: Vec<String>,
}

impl SaveSummary {
    pub fn is_empty(&self) -> bool {
        self.written.is_empty() && self.deleted.is_empty()
    }
}

/// Loads turn state from storage and writes back only what changed.
#[derive(Debug, Clone, Default)]
pub struct TurnStateManager {
    config: StateConfig,
}

impl TurnStateManager {
    pub fn new(config: StateConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StateConfig {
        &self.config
    }

    pub fn storage_keys(&self, ctx: &TurnContext) -> Result<StorageKeys> {
        StorageKeys::from_activity(ctx.activity())
    }

    /// Read conversation and user state for the turn and start a fresh temp
    /// scope. Without storage every scope starts empty.
    pub async fn load_state(
        &self,
        storage: Option<&dyn Storage>,
        ctx: &TurnContext,
        cancel: &CancellationToken,
    ) -> Result<TurnState> {
        let keys = self
            .storage_keys(ctx)
            .map_err(|e| StateError::Load(e.to_string()))?;
        tracing::debug!(
            conversation_key = %keys.conversation,
            user_key = %keys.user,
            "Loading turn state"
        );

        let mut items = match storage {
            Some(storage) => storage
                .read(&[keys.conversation.clone(), keys.user.clone()], cancel)
                .await
                .map_err(|e| StateError::Load(e.to_string()))?,
            None => StoreItems::new(),
        };

        let conversation = take_record(&mut items, &keys.conversation);
        let user = take_record(&mut items, &keys.user);

        let policy = self.config.resurrection;
        let mut entries = BTreeMap::new();
        entries.insert(
            Scope::Conversation,
            TurnStateEntry::with_policy(conversation, Some(keys.conversation), policy),
        );
        entries.insert(
            Scope::User,
            TurnStateEntry::with_policy(user, Some(keys.user), policy),
        );
        entries.insert(
            Scope::Temp,
            TurnStateEntry::with_policy(Record::new(), None, policy),
        );

        Ok(TurnState::from_entries(self.config.clone(), entries))
    }

    /// Write changed scopes and delete deleted ones. Write and delete run
    /// concurrently; each is skipped when it has nothing to do.
    pub async fn save_state(
        &self,
        storage: Option<&dyn Storage>,
        ctx: &TurnContext,
        state: &TurnState,
        cancel: &CancellationToken,
    ) -> Result<SaveSummary> {
        if !state.is_loaded() {
            return Err(StateError::NotLoaded);
        }

        let mut changes = StoreItems::new();
        let mut deletions = Vec::new();
        for (_, entry) in state.entries() {
            let Some(key) = entry.storage_key() else {
                continue;
            };
            if entry.is_deleted() {
                deletions.push(key.to_string());
            } else if entry.has_changed() {
                changes.insert(key.to_string(), entry.peek().to_value());
            }
        }

        let mut written: Vec<String> = changes.keys().cloned().collect();
        written.sort();
        let summary = SaveSummary {
            written,
            deleted: deletions.clone(),
        };

        if summary.is_empty() {
            tracing::debug!("Turn state unchanged, nothing to save");
            return Ok(summary);
        }

        if let Some(storage) = storage {
            let write = async {
                if changes.is_empty() {
                    Ok(())
                } else {
                    storage.write(changes, cancel).await
                }
            };
            let delete = async {
                if deletions.is_empty() {
                    Ok(())
                } else {
                    storage.delete(&deletions, cancel).await
                }
            };
            tokio::try_join!(write, delete).map_err(|e| StateError::Save(e.to_string()))?;

            tracing::info!(
                conversation = ?ctx.activity().conversation_id(),
                written = summary.written.len(),
                deleted = summary.deleted.len(),
                "Turn state saved"
            );
        }

        Ok(summary)
    }
}

// Missing and null values start empty; any other non-object value is dropped.
fn take_record(items: &mut StoreItems, key: &str) -> Record {
    match items.remove(key) {
        None | Some(serde_json::Value::Null) => Record::new(),
        Some(value) => Record::from_value(value).unwrap_or_else(|| {
            tracing::warn!(key = %key, "Stored state is not an object, starting empty");
            Record::new()
        }),
    }
}
