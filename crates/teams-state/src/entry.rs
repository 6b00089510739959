use crate::config::ResurrectionPolicy;
use crate::record::Record;

/// Observable status of an entry relative to what was loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStatus {
    Clean,
    Dirty,
    Deleted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Live,
    Deleted,
}

/// One state scope for the duration of a turn.
///
/// Remembers the hash of the record it was created with so the save path can
/// tell whether anything changed. Deletion is soft: the record stays in place
/// until the next [`value`](Self::value) call, which swaps in an empty record
/// and revives the entry.
#[derive(Debug, Clone)]
pub struct TurnStateEntry {
    value: Record,
    storage_key: Option<String>,
    original_hash: String,
    lifecycle: Lifecycle,
    policy: ResurrectionPolicy,
}

impl TurnStateEntry {
    /// Wrap `value`; entries without a storage key are never persisted.
    pub fn new(value: Record, storage_key: Option<String>) -> Self {
        Self::with_policy(value, storage_key, ResurrectionPolicy::default())
    }

    pub fn with_policy(
        value: Record,
        storage_key: Option<String>,
        policy: ResurrectionPolicy,
    ) -> Self {
        let original_hash = value.content_hash();
        Self {
            value,
            storage_key,
            original_hash,
            lifecycle: Lifecycle::Live,
            policy,
        }
    }

    /// Whether the record differs from what the entry was created with.
    ///
    /// Re-hashes the record on every call.
    pub fn has_changed(&self) -> bool {
        self.value.content_hash() != self.original_hash
    }

    pub fn is_deleted(&self) -> bool {
        self.lifecycle == Lifecycle::Deleted
    }

    pub fn status(&self) -> EntryStatus {
        match self.lifecycle {
            Lifecycle::Deleted => EntryStatus::Deleted,
            Lifecycle::Live if self.has_changed() => EntryStatus::Dirty,
            Lifecycle::Live => EntryStatus::Clean,
        }
    }

    pub fn storage_key(&self) -> Option<&str> {
        self.storage_key.as_deref()
    }

    /// Baseline hash used by [`has_changed`](Self::has_changed).
    pub fn original_hash(&self) -> &str {
        &self.original_hash
    }

    /// Mutable access to the record.
    ///
    /// If the entry was deleted this first replaces the record with an empty
    /// one and clears the deleted flag.
    pub fn value(&mut self) -> &mut Record {
        if self.lifecycle == Lifecycle::Deleted {
            self.value = Record::new();
            self.lifecycle = Lifecycle::Live;
            if self.policy == ResurrectionPolicy::ResetHash {
                self.original_hash = self.value.content_hash();
            }
        }
        &mut self.value
    }

    /// Read the record as it is, without reviving a deleted entry.
    pub fn peek(&self) -> &Record {
        &self.value
    }

    /// Swap in a new record. Leaves the baseline hash and deleted flag alone.
    pub fn replace(&mut self, value: Record) {
        self.value = value;
    }

    pub fn delete(&mut self) {
        self.lifecycle = Lifecycle::Deleted;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> Record {
        Record::from_value(value).unwrap()
    }

    #[test]
    fn test_new_entry_is_unchanged() {
        let entry = TurnStateEntry::new(record(json!({ "a": 1 })), Some("key".into()));
        assert!(!entry.has_changed());
        assert!(!entry.is_deleted());
        assert_eq!(entry.status(), EntryStatus::Clean);
        assert_eq!(entry.storage_key(), Some("key"));
    }

    #[test]
    fn test_mutation_marks_entry_changed() {
        let mut entry = TurnStateEntry::new(Record::new(), None);
        entry.value().insert("k", json!("x"));
        assert!(entry.has_changed());
        assert_eq!(entry.status(), EntryStatus::Dirty);
    }

    #[test]
    fn test_reverting_mutation_reads_unchanged() {
        let mut entry = TurnStateEntry::new(record(json!({ "a": 1 })), None);
        entry.value().insert("a", json!(2));
        entry.value().insert("a", json!(1));
        assert!(!entry.has_changed());
    }

    #[test]
    fn test_delete_then_value_resurrects_empty_record() {
        let mut entry = TurnStateEntry::new(record(json!({ "a": 1 })), Some("key".into()));
        entry.delete();
        assert!(entry.is_deleted());
        assert_eq!(entry.status(), EntryStatus::Deleted);
        // Still holds the old record until read through `value`.
        assert_eq!(entry.peek().len(), 1);

        let value = entry.value();
        assert!(value.is_empty());
        assert!(!entry.is_deleted());
    }

    #[test]
    fn test_resurrected_entry_keeps_original_hash_by_default() {
        let mut entry = TurnStateEntry::new(record(json!({ "test": "old" })), None);
        let loaded_hash = entry.original_hash().to_string();
        entry.delete();
        entry.value();

        assert_eq!(entry.original_hash(), loaded_hash);
        assert!(entry.has_changed());
        assert_eq!(entry.status(), EntryStatus::Dirty);
    }

    #[test]
    fn test_resurrected_entry_from_empty_reads_unchanged() {
        let mut entry = TurnStateEntry::new(Record::new(), None);
        entry.delete();
        entry.value();
        assert!(!entry.has_changed());
    }

    #[test]
    fn test_reset_hash_policy_rebaselines_on_resurrection() {
        let mut entry = TurnStateEntry::with_policy(
            record(json!({ "test": "old" })),
            None,
            ResurrectionPolicy::ResetHash,
        );
        entry.delete();
        entry.value();

        assert!(!entry.has_changed());
        assert_eq!(entry.original_hash(), Record::new().content_hash());
    }

    #[test]
    fn test_replace_keeps_hash_and_deleted_flag() {
        let mut entry = TurnStateEntry::new(Record::new(), None);
        entry.delete();
        entry.replace(record(json!({ "b": true })));

        assert!(entry.is_deleted());
        assert!(entry.has_changed());
        assert_eq!(entry.peek().get("b"), Some(&json!(true)));
    }
}
