use serde::{Deserialize, Serialize};

/// What happens to an entry's baseline hash when a deleted entry is read again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResurrectionPolicy {
    /// Keep the hash taken at load time. The fresh empty record reads as
    /// changed unless the loaded record was itself empty.
    #[default]
    KeepOriginalHash,
    /// Re-baseline on the fresh empty record so it reads as unchanged.
    ResetHash,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateConfig {
    #[serde(default)]
    pub resurrection: ResurrectionPolicy,
}

impl StateConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resurrection(mut self, policy: ResurrectionPolicy) -> Self {
        self.resurrection = policy;
        self
    }
}
