//! End-to-end load / mutate / save flows against in-memory storage.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::json;
use teams_persist::{MemoryStorage, Storage, StorageError, StoreItems};
use teams_state::{
    ResurrectionPolicy, Scope, StateConfig, StateError, TurnState, TurnStateManager,
};
use teams_types::{Activity, TurnContext};
use tokio_util::sync::CancellationToken;

const CONVERSATION_KEY: &str = "test/bot/conversations/conv";
const USER_KEY: &str = "test/bot/users/user";

fn ctx() -> TurnContext {
    TurnContext::new(
        Activity::message("hello")
            .with_channel_id("test")
            .with_recipient("bot")
            .with_conversation("conv")
            .with_from("user"),
    )
}

async fn load(storage: &MemoryStorage) -> TurnState {
    let mut state = TurnState::new();
    state
        .load_state(Some(storage), &ctx(), &CancellationToken::new())
        .await
        .unwrap();
    state
}

#[tokio::test]
async fn test_empty_storage_loads_empty_scopes() {
    let storage = MemoryStorage::new();
    let mut state = load(&storage).await;

    assert!(state.conversation().unwrap().is_empty());
    assert!(state.user().unwrap().is_empty());
    assert!(state.temp().unwrap().is_empty());
}

#[tokio::test]
async fn test_only_changed_conversation_is_written() {
    let storage = MemoryStorage::new();
    let mut state = load(&storage).await;

    state.conversation().unwrap().insert("x", json!(1));
    let summary = state
        .save_state(Some(&storage), &ctx(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(summary.written, vec![CONVERSATION_KEY.to_string()]);
    assert!(summary.deleted.is_empty());

    let stored = storage.snapshot().await;
    assert_eq!(stored[CONVERSATION_KEY]["x"], json!(1));
    assert!(!stored.contains_key(USER_KEY));
}

#[tokio::test]
async fn test_temp_scope_is_never_persisted() {
    let storage = MemoryStorage::new();
    let mut state = load(&storage).await;

    state.set_value("temp.key", "v").unwrap();
    let summary = state
        .save_state(Some(&storage), &ctx(), &CancellationToken::new())
        .await
        .unwrap();

    assert!(summary.is_empty());
    assert!(storage.is_empty().await);
    assert!(storage
        .snapshot()
        .await
        .keys()
        .all(|key| !key.contains("temp")));
}

#[tokio::test]
async fn test_state_round_trips_across_turns() {
    let storage = MemoryStorage::new();

    let mut first = load(&storage).await;
    first.set_value("conversation.count", 1).unwrap();
    first.set_value("user.name", "Ada").unwrap();
    first
        .save_state(Some(&storage), &ctx(), &CancellationToken::new())
        .await
        .unwrap();

    let mut second = load(&storage).await;
    assert_eq!(second.get_value_as::<i64>("conversation.count").unwrap(), Some(1));
    assert_eq!(second.get_value("user.name").unwrap(), Some(&json!("Ada")));
    assert!(!second.entry(Scope::Conversation).unwrap().has_changed());
}

#[tokio::test]
async fn test_deleted_conversation_is_removed_from_storage() {
    let mut seed = StoreItems::new();
    seed.insert(CONVERSATION_KEY.to_string(), json!({ "test": "old" }));
    let storage = MemoryStorage::with_items(seed);

    let mut state = load(&storage).await;
    assert_eq!(state.get_value("conversation.test").unwrap(), Some(&json!("old")));

    state.delete_conversation_state().unwrap();
    let summary = state
        .save_state(Some(&storage), &ctx(), &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(summary.deleted, vec![CONVERSATION_KEY.to_string()]);

    let read = storage
        .read(&[CONVERSATION_KEY.to_string()], &CancellationToken::new())
        .await
        .unwrap();
    assert!(read.is_empty());
}

#[tokio::test]
async fn test_write_and_delete_in_same_save() {
    let mut seed = StoreItems::new();
    seed.insert(USER_KEY.to_string(), json!({ "name": "Ada" }));
    let storage = MemoryStorage::with_items(seed);

    let mut state = load(&storage).await;
    state.delete_user_state().unwrap();
    state.set_value("conversation.topic", "rust").unwrap();

    let summary = state
        .save_state(Some(&storage), &ctx(), &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(summary.written, vec![CONVERSATION_KEY.to_string()]);
    assert_eq!(summary.deleted, vec![USER_KEY.to_string()]);

    let stored = storage.snapshot().await;
    assert_eq!(stored[CONVERSATION_KEY], json!({ "topic": "rust" }));
    assert!(!stored.contains_key(USER_KEY));
}

#[tokio::test]
async fn test_resurrected_scope_is_written_as_empty_with_default_policy() {
    let mut seed = StoreItems::new();
    seed.insert(CONVERSATION_KEY.to_string(), json!({ "test": "old" }));
    let storage = MemoryStorage::with_items(seed);

    let mut state = load(&storage).await;
    state.delete_conversation_state().unwrap();
    // Reading revives the scope as an empty record that still differs from
    // the hash taken at load time.
    assert!(state.conversation().unwrap().is_empty());

    let summary = state
        .save_state(Some(&storage), &ctx(), &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(summary.written, vec![CONVERSATION_KEY.to_string()]);
    assert_eq!(storage.snapshot().await[CONVERSATION_KEY], json!({}));
}

#[tokio::test]
async fn test_resurrected_scope_is_skipped_with_reset_hash_policy() {
    let mut seed = StoreItems::new();
    seed.insert(CONVERSATION_KEY.to_string(), json!({ "test": "old" }));
    let storage = MemoryStorage::with_items(seed);

    let config = StateConfig::new().with_resurrection(ResurrectionPolicy::ResetHash);
    let mut state = TurnState::with_config(config);
    state
        .load_state(Some(&storage), &ctx(), &CancellationToken::new())
        .await
        .unwrap();

    state.delete_conversation_state().unwrap();
    assert!(state.conversation().unwrap().is_empty());

    let summary = state
        .save_state(Some(&storage), &ctx(), &CancellationToken::new())
        .await
        .unwrap();
    assert!(summary.is_empty());
    assert_eq!(storage.snapshot().await[CONVERSATION_KEY], json!({ "test": "old" }));
}

#[tokio::test]
async fn test_non_object_stored_value_loads_empty() {
    let mut seed = StoreItems::new();
    seed.insert(USER_KEY.to_string(), json!("corrupt"));
    let storage = MemoryStorage::with_items(seed);

    let mut state = load(&storage).await;
    assert!(state.user().unwrap().is_empty());
}

#[tokio::test]
async fn test_load_without_storage_and_save_reports_pending_keys() {
    let manager = TurnStateManager::default();
    let cancel = CancellationToken::new();
    let mut state = manager.load_state(None, &ctx(), &cancel).await.unwrap();

    state.set_value("user.seen", true).unwrap();
    let summary = manager.save_state(None, &ctx(), &state, &cancel).await.unwrap();
    assert_eq!(summary.written, vec![USER_KEY.to_string()]);
}

#[tokio::test]
async fn test_missing_activity_field_fails_load() {
    let mut activity = ctx().activity().clone();
    activity.conversation = None;
    let ctx = TurnContext::new(activity);

    let mut state = TurnState::new();
    let err = state
        .load_state(None, &ctx, &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(&err, StateError::Load(message) if message.contains("conversation.id")));
    assert!(!state.is_loaded());
}

#[tokio::test]
async fn test_cancelled_load_is_wrapped() {
    let storage = MemoryStorage::new();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let mut state = TurnState::new();
    let err = state
        .load_state(Some(&storage), &ctx(), &cancel)
        .await
        .unwrap_err();
    assert!(matches!(&err, StateError::Load(message) if message.contains("cancelled")));
}

/// Storage whose writes always fail; counts calls.
#[derive(Default)]
struct FailingStorage {
    writes: AtomicUsize,
    deletes: AtomicUsize,
}

#[async_trait]
impl Storage for FailingStorage {
    async fn read(
        &self,
        _keys: &[String],
        _cancel: &CancellationToken,
    ) -> Result<StoreItems, StorageError> {
        Ok(StoreItems::new())
    }

    async fn write(
        &self,
        _changes: StoreItems,
        _cancel: &CancellationToken,
    ) -> Result<(), StorageError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        Err(StorageError::Backend("disk full".to_string()))
    }

    async fn delete(&self, _keys: &[String], _cancel: &CancellationToken) -> Result<(), StorageError> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[tokio::test]
async fn test_storage_failure_is_wrapped_on_save() {
    let storage = FailingStorage::default();
    let cancel = CancellationToken::new();
    let mut state = TurnState::new();
    state.load_state(Some(&storage), &ctx(), &cancel).await.unwrap();

    state.set_value("conversation.x", 1).unwrap();
    let err = state
        .save_state(Some(&storage), &ctx(), &cancel)
        .await
        .unwrap_err();

    assert!(matches!(&err, StateError::Save(message) if message.contains("disk full")));
    assert_eq!(storage.writes.load(Ordering::SeqCst), 1);
    assert_eq!(storage.deletes.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_unchanged_state_issues_no_storage_calls() {
    let storage = FailingStorage::default();
    let cancel = CancellationToken::new();
    let mut state = TurnState::new();
    state.load_state(Some(&storage), &ctx(), &cancel).await.unwrap();

    state.set_value("temp.scratch", 1).unwrap();
    state.save_state(Some(&storage), &ctx(), &cancel).await.unwrap();

    assert_eq!(storage.writes.load(Ordering::SeqCst), 0);
    assert_eq!(storage.deletes.load(Ordering::SeqCst), 0);
}
