//! Prelude module for convenient imports
//!
//! Import everything you need with:
//! ```rust
//! use teams_ai::prelude::*;
//! ```

pub use crate::{
    Activity, TurnContext,
    Storage, StoreItems, MemoryStorage, StorageError,
    TurnState, TurnStateManager, TurnStateEntry, Record, Scope, StatePath,
    StateConfig, ResurrectionPolicy, StateError, SaveSummary, TempState,
    CancellationToken,
};

#[cfg(feature = "mongodb")]
pub use crate::MongoStorage;
