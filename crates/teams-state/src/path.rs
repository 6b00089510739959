//! Parsing of dotted `scope.property` state paths.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("Invalid state path: {0}")]
    InvalidPath(String),

    #[error("Invalid state scope: {0}")]
    InvalidScope(String),
}

/// The three state partitions of a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Conversation,
    User,
    Temp,
}

impl Scope {
    pub const ALL: [Scope; 3] = [Scope::Conversation, Scope::User, Scope::Temp];

    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Conversation => "conversation",
            Scope::User => "user",
            Scope::Temp => "temp",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "conversation" => Ok(Scope::Conversation),
            "user" => Ok(Scope::User),
            "temp" => Ok(Scope::Temp),
            other => Err(PathError::InvalidScope(other.to_string())),
        }
    }
}

/// A resolved `scope.property` path. A bare `property` lives in `temp`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatePath {
    pub scope: Scope,
    pub property: String,
}

impl StatePath {
    pub fn new(scope: Scope, property: impl Into<String>) -> Self {
        Self {
            scope,
            property: property.into(),
        }
    }

    /// Segment count is checked before the scope name, so `a.b.c` is an
    /// invalid path whatever `a` is. Empty segments are invalid too.
    pub fn parse(path: &str) -> Result<Self, PathError> {
        let segments: Vec<&str> = path.split('.').collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(PathError::InvalidPath(path.to_string()));
        }

        match segments.as_slice() {
            [property] => Ok(Self::new(Scope::Temp, *property)),
            [scope, property] => Ok(Self::new(scope.parse()?, *property)),
            _ => Err(PathError::InvalidPath(path.to_string())),
        }
    }
}

impl FromStr for StatePath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for StatePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.scope, self.property)
    }
}
