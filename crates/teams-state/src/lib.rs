//! Turn-scoped bot state.
//!
//! A [`TurnState`] holds three scopes for the duration of a turn:
//! `conversation` and `user` are loaded from and saved to a
//! [`Storage`](teams_persist::Storage) provider, `temp` lives only for the
//! turn. Values are addressed with dotted paths such as `conversation.count`.

pub mod config;
pub mod entry;
pub mod error;
pub mod manager;
pub mod path;
pub mod record;
pub mod scopes;
pub mod turn_state;

pub use config::{ResurrectionPolicy, StateConfig};
pub use entry::{EntryStatus, TurnStateEntry};
pub use error::StateError;
pub use manager::{SaveSummary, StorageKeys, TurnStateManager};
pub use path::{PathError, Scope, StatePath};
pub use record::Record;
pub use scopes::TempState;
pub use turn_state::TurnState;
