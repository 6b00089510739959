use thiserror::Error;

use crate::path::PathError;

#[derive(Error, Debug)]
pub enum StateError {
    #[error("TurnState hasn't been loaded. Call load_state() first.")]
    NotLoaded,

    #[error(transparent)]
    Path(#[from] PathError),

    #[error("Missing required activity field: {0}")]
    MissingActivityField(&'static str),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to load turn state: {0}")]
    Load(String),

    #[error("Failed to save turn state: {0}")]
    Save(String),
}

pub type Result<T> = std::result::Result<T, StateError>;
