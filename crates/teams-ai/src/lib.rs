//! # Teams AI - turn state for bots
//!
//! Every turn of a bot gets three state scopes:
//! - **conversation**: shared by everyone in the conversation, persisted
//! - **user**: follows a user across conversations, persisted
//! - **temp**: scratch space for the current turn, never persisted
//!
//! State is loaded at the start of a turn, mutated by handlers through
//! dotted paths (`conversation.count`, `user.name`, `input`), and saved at the
//! end. Only scopes whose content changed are written, and deleted scopes are
//! removed from storage.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use teams_ai::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), StateError> {
//!     let storage = MemoryStorage::new();
//!     let cancel = CancellationToken::new();
//!     let ctx = TurnContext::new(
//!         Activity::message("hello")
//!             .with_channel_id("msteams")
//!             .with_recipient("bot")
//!             .with_conversation("conv-1")
//!             .with_from("user-1"),
//!     );
//!
//!     let mut state = TurnState::new();
//!     state.load_state(Some(&storage), &ctx, &cancel).await?;
//!
//!     let count = state.get_value_as::<u64>("conversation.count")?.unwrap_or(0);
//!     state.set_value("conversation.count", count + 1)?;
//!
//!     state.save_state(Some(&storage), &ctx, &cancel).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **`teams-types`**: Activity and turn context
//! - **`teams-persist`**: `Storage` trait, in-memory and MongoDB providers
//! - **`teams-state`**: `Record`, `TurnStateEntry`, `TurnState`, `TurnStateManager`
//!
//! ## License
//!
//! MIT

pub mod prelude;

pub use teams_types::{Activity, ActivityType, ChannelAccount, ConversationAccount, TurnContext};

pub use teams_persist::{MemoryStorage, Storage, StorageError, StoreItems};

#[cfg(feature = "mongodb")]
pub use teams_persist::MongoStorage;

pub use teams_state::{
    EntryStatus, PathError, Record, ResurrectionPolicy, SaveSummary, Scope, StateConfig,
    StateError, StatePath, StorageKeys, TempState, TurnState, TurnStateEntry, TurnStateManager,
};

pub use tokio_util::sync::CancellationToken;

// Re-export dependencies for convenience
pub use serde_json;
pub use teams_persist;
pub use teams_state;
pub use teams_types;
