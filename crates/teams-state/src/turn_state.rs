use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use teams_persist::Storage;
use teams_types::TurnContext;
use tokio_util::sync::CancellationToken;

use crate::config::StateConfig;
use crate::entry::TurnStateEntry;
use crate::error::{Result, StateError};
use crate::manager::{SaveSummary, TurnStateManager};
use crate::path::{Scope, StatePath};
use crate::record::Record;
use crate::scopes::TempState;

/// Conversation, user and temp state for a single turn.
///
/// Starts empty; every accessor fails with [`StateError::NotLoaded`] until
/// [`load_state`](Self::load_state) has run.
#[derive(Debug, Default)]
pub struct TurnState {
    config: StateConfig,
    entries: BTreeMap<Scope, TurnStateEntry>,
}

impl TurnState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: StateConfig) -> Self {
        Self {
            config,
            entries: BTreeMap::new(),
        }
    }

    pub(crate) fn from_entries(config: StateConfig, entries: BTreeMap<Scope, TurnStateEntry>) -> Self {
        Self { config, entries }
    }

    pub fn config(&self) -> &StateConfig {
        &self.config
    }

    pub fn is_loaded(&self) -> bool {
        self.entries.contains_key(&Scope::Conversation)
    }

    /// Load state for the turn. Returns `false` without touching storage when
    /// state is already loaded.
    pub async fn load_state(
        &mut self,
        storage: Option<&dyn Storage>,
        ctx: &TurnContext,
        cancel: &CancellationToken,
    ) -> Result<bool> {
        if self.is_loaded() {
            return Ok(false);
        }
        self.reload_state(storage, ctx, cancel).await?;
        Ok(true)
    }

    /// Load state even if it was loaded before, discarding unsaved changes.
    pub async fn reload_state(
        &mut self,
        storage: Option<&dyn Storage>,
        ctx: &TurnContext,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let manager = TurnStateManager::new(self.config.clone());
        let loaded = manager.load_state(storage, ctx, cancel).await?;
        self.entries = loaded.entries;
        Ok(())
    }

    /// Persist changed scopes and delete deleted ones.
    pub async fn save_state(
        &self,
        storage: Option<&dyn Storage>,
        ctx: &TurnContext,
        cancel: &CancellationToken,
    ) -> Result<SaveSummary> {
        if !self.is_loaded() {
            return Err(StateError::NotLoaded);
        }
        TurnStateManager::new(self.config.clone())
            .save_state(storage, ctx, self, cancel)
            .await
    }

    pub fn entry(&self, scope: Scope) -> Result<&TurnStateEntry> {
        self.entries.get(&scope).ok_or(StateError::NotLoaded)
    }

    pub fn entry_mut(&mut self, scope: Scope) -> Result<&mut TurnStateEntry> {
        self.entries.get_mut(&scope).ok_or(StateError::NotLoaded)
    }

    pub fn entries(&self) -> impl Iterator<Item = (Scope, &TurnStateEntry)> {
        self.entries.iter().map(|(scope, entry)| (*scope, entry))
    }

    pub fn conversation(&mut self) -> Result<&mut Record> {
        Ok(self.entry_mut(Scope::Conversation)?.value())
    }

    pub fn set_conversation(&mut self, value: Record) -> Result<()> {
        self.entry_mut(Scope::Conversation)?.replace(value);
        Ok(())
    }

    pub fn user(&mut self) -> Result<&mut Record> {
        Ok(self.entry_mut(Scope::User)?.value())
    }

    pub fn set_user(&mut self, value: Record) -> Result<()> {
        self.entry_mut(Scope::User)?.replace(value);
        Ok(())
    }

    pub fn temp(&mut self) -> Result<&mut Record> {
        Ok(self.entry_mut(Scope::Temp)?.value())
    }

    pub fn set_temp(&mut self, value: Record) -> Result<()> {
        self.entry_mut(Scope::Temp)?.replace(value);
        Ok(())
    }

    /// Temp scope with typed accessors for the SDK's well-known keys.
    pub fn temp_state(&mut self) -> Result<TempState<'_>> {
        Ok(TempState::new(self.temp()?))
    }

    pub fn scope(&mut self, scope: Scope) -> Result<&mut Record> {
        Ok(self.entry_mut(scope)?.value())
    }

    pub fn get_value(&mut self, path: &str) -> Result<Option<&Value>> {
        let path = StatePath::parse(path)?;
        Ok(self.scope(path.scope)?.get(&path.property))
    }

    pub fn get_value_as<T: DeserializeOwned>(&mut self, path: &str) -> Result<Option<T>> {
        let path = StatePath::parse(path)?;
        Ok(self.scope(path.scope)?.get_as(&path.property)?)
    }

    pub fn set_value<T: Serialize>(&mut self, path: &str, value: T) -> Result<()> {
        let path = StatePath::parse(path)?;
        let value = serde_json::to_value(value)?;
        self.scope(path.scope)?.insert(path.property, value);
        Ok(())
    }

    pub fn has_value(&mut self, path: &str) -> Result<bool> {
        let path = StatePath::parse(path)?;
        Ok(self.scope(path.scope)?.contains_key(&path.property))
    }

    /// Remove a value, returning it if it was present.
    pub fn delete_value(&mut self, path: &str) -> Result<Option<Value>> {
        let path = StatePath::parse(path)?;
        Ok(self.scope(path.scope)?.remove(&path.property))
    }

    pub fn delete_conversation_state(&mut self) -> Result<()> {
        self.entry_mut(Scope::Conversation)?.delete();
        Ok(())
    }

    pub fn delete_user_state(&mut self) -> Result<()> {
        self.entry_mut(Scope::User)?.delete();
        Ok(())
    }

    pub fn delete_temp_state(&mut self) -> Result<()> {
        self.entry_mut(Scope::Temp)?.delete();
        Ok(())
    }
}
