//! Durable storage of the todo list under a single key.
//!
//! The slot holds a JSON array of `{id, text, done}` objects. Reads that find
//! nothing usable fall back to the starter list; writes that fail are logged
//! and dropped so the list stays usable without storage.
//!
//! A sibling slot, `<key>.next_id`, holds the next sequential id to issue so
//! that ids of deleted todos are not handed out again after a restart.

use crate::types::{TodoCollection, TodoId, TodoItem};
use tasklist_core::storage::{KeyValueStore, StorageError};
use thiserror::Error;

/// Key the list is stored under unless configured otherwise
pub const DEFAULT_STORAGE_KEY: &str = "todos";

/// Errors from reading or writing the persisted list
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// The storage backend failed
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// The stored value is not a valid todo list
    #[error("malformed todo list: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// The list shown on first run
#[must_use]
pub fn default_collection() -> TodoCollection {
    TodoCollection::from_items(vec![
        TodoItem::new(TodoId::Number(1), "Learn React".to_string()),
        TodoItem::new(TodoId::Number(2), "Build a todo app".to_string()),
    ])
    .unwrap_or_default()
}

/// Reads and writes the todo list in one key-value slot
pub struct PersistenceAdapter {
    storage: Box<dyn KeyValueStore>,
    key: String,
    next_id_key: String,
}

impl std::fmt::Debug for PersistenceAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistenceAdapter")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl PersistenceAdapter {
    /// Store the list in `storage` under `key`
    pub fn new(storage: impl KeyValueStore + 'static, key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            storage: Box::new(storage),
            next_id_key: format!("{key}.next_id"),
            key,
        }
    }

    /// The slot this adapter reads and writes
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read the stored list
    ///
    /// Returns `Ok(None)` if nothing has been stored yet.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] if the backend fails or the stored value
    /// is not a valid list.
    pub fn try_load(&self) -> Result<Option<TodoCollection>, PersistenceError> {
        let Some(raw) = self.storage.get(&self.key)? else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_str(&raw)?))
    }

    /// Read the stored list, falling back to [`default_collection`]
    #[tracing::instrument(skip(self), fields(key = %self.key))]
    pub fn load(&self) -> TodoCollection {
        match self.try_load() {
            Ok(Some(todos)) => {
                tracing::debug!(count = todos.len(), "Loaded todo list");
                todos
            },
            Ok(None) => {
                tracing::info!("No stored todo list, starting with defaults");
                default_collection()
            },
            Err(error) => {
                tracing::warn!(%error, "Stored todo list unusable, starting with defaults");
                metrics::counter!("tasklist.persistence.load_fallbacks").increment(1);
                default_collection()
            },
        }
    }

    /// Write the full list, replacing the stored value
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] if serialization or the write fails.
    pub fn try_save(&self, todos: &TodoCollection) -> Result<(), PersistenceError> {
        let raw = serde_json::to_string(todos)?;
        self.storage.set(&self.key, &raw)?;
        Ok(())
    }

    /// Write the full list; failures are logged, never returned
    #[tracing::instrument(skip(self, todos), fields(key = %self.key, count = todos.len()))]
    pub fn save(&self, todos: &TodoCollection) {
        match self.try_save(todos) {
            Ok(()) => {
                metrics::counter!("tasklist.persistence.saves").increment(1);
                tracing::trace!("Saved todo list");
            },
            Err(error) => {
                metrics::counter!("tasklist.persistence.save_failures").increment(1);
                tracing::warn!(%error, "Failed to save todo list, keeping in-memory state");
            },
        }
    }

    /// The slot holding the sequential id high-water mark
    #[must_use]
    pub fn next_id_key(&self) -> &str {
        &self.next_id_key
    }

    /// Read the stored high-water mark
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] if the backend fails or the stored value
    /// is not a non-negative integer.
    pub fn try_load_next_id(&self) -> Result<Option<u64>, PersistenceError> {
        let Some(raw) = self.storage.get(&self.next_id_key)? else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_str(&raw)?))
    }

    /// Read the stored high-water mark, treating an unusable one as absent
    #[tracing::instrument(skip(self), fields(key = %self.next_id_key))]
    pub fn load_next_id(&self) -> Option<u64> {
        self.try_load_next_id().unwrap_or_else(|error| {
            tracing::warn!(%error, "Stored id high-water mark unusable, ignoring it");
            metrics::counter!("tasklist.persistence.load_fallbacks").increment(1);
            None
        })
    }

    /// Write the high-water mark, replacing the stored value
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Storage`] if the write fails.
    pub fn try_save_next_id(&self, next: u64) -> Result<(), PersistenceError> {
        self.storage.set(&self.next_id_key, &next.to_string())?;
        Ok(())
    }

    /// Write the high-water mark; failures are logged, never returned
    pub fn save_next_id(&self, next: u64) {
        if let Err(error) = self.try_save_next_id(next) {
            metrics::counter!("tasklist.persistence.save_failures").increment(1);
            tracing::warn!(%error, next, "Failed to save id high-water mark");
        }
    }

    /// Delete the stored list and high-water mark so the next load starts
    /// from defaults
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Storage`] if the backend fails.
    pub fn clear(&self) -> Result<(), PersistenceError> {
        self.storage.remove(&self.key)?;
        self.storage.remove(&self.next_id_key)?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code
mod tests {
    use super::*;
    use tasklist_testing::{FailingKeyValueStore, InMemoryKeyValueStore};

    fn sample() -> TodoCollection {
        let mut done = TodoItem::new(TodoId::from("a-1"), "Ship it".into());
        done.done = true;
        TodoCollection::from_items(vec![
            TodoItem::new(TodoId::Number(5), "Write tests".into()),
            done,
        ])
        .unwrap()
    }

    #[test]
    fn default_collection_matches_first_run() {
        let todos = default_collection();
        let rows: Vec<(Option<u64>, &str, bool)> = todos
            .iter()
            .map(|t| (t.id.as_number(), t.text.as_str(), t.done))
            .collect();
        assert_eq!(
            rows,
            vec![
                (Some(1), "Learn React", false),
                (Some(2), "Build a todo app", false)
            ]
        );
    }

    #[test]
    fn empty_slot_loads_defaults() {
        let adapter = PersistenceAdapter::new(InMemoryKeyValueStore::new(), DEFAULT_STORAGE_KEY);
        assert_eq!(adapter.try_load().unwrap(), None);
        assert_eq!(adapter.load(), default_collection());
    }

    #[test]
    fn save_then_load_round_trips() {
        let storage = InMemoryKeyValueStore::new();
        let adapter = PersistenceAdapter::new(storage.clone(), "todos");

        adapter.save(&sample());

        assert_eq!(adapter.load(), sample());
        assert_eq!(storage.write_count(), 1);
    }

    #[test]
    fn stored_format_is_plain_json_array() {
        let storage = InMemoryKeyValueStore::new();
        PersistenceAdapter::new(storage.clone(), "todos").save(&sample());

        let raw: serde_json::Value = serde_json::from_str(&storage.raw("todos").unwrap()).unwrap();
        assert_eq!(
            raw,
            serde_json::json!([
                {"id": 5, "text": "Write tests", "done": false},
                {"id": "a-1", "text": "Ship it", "done": true}
            ])
        );
    }

    #[test]
    fn malformed_slot_falls_back() {
        for raw in [
            "not json",
            r#"{"id":1}"#,
            r#"[{"id":1,"text":"a"}]"#,
            r#"[{"id":1,"text":"   ","done":false}]"#,
            r#"[{"id":1,"text":"a","done":false},{"id":1,"text":"b","done":false}]"#,
        ] {
            let adapter =
                PersistenceAdapter::new(InMemoryKeyValueStore::with_slot("todos", raw), "todos");
            assert!(adapter.try_load().is_err(), "{raw} should be rejected");
            assert_eq!(adapter.load(), default_collection(), "{raw}");
        }
    }

    #[test]
    fn ids_outside_u64_survive_load_and_save() {
        for raw in [
            r#"[{"id":-1,"text":"Negative","done":false}]"#,
            r#"[{"id":1712345678901.5,"text":"Fractional","done":true}]"#,
            r#"[{"id":1e3,"text":"Exponent","done":false}]"#,
        ] {
            let storage = InMemoryKeyValueStore::with_slot("todos", raw);
            let adapter = PersistenceAdapter::new(storage.clone(), "todos");

            let loaded = adapter.load();
            assert_eq!(loaded.len(), 1, "{raw}");
            assert!(matches!(loaded.items()[0].id, TodoId::OtherNumber(_)), "{raw}");

            adapter.save(&loaded);
            let reread = adapter.try_load().unwrap().unwrap();
            assert_eq!(reread, loaded, "{raw}");
        }
    }

    #[test]
    fn next_id_round_trips_in_sibling_slot() {
        let storage = InMemoryKeyValueStore::new();
        let adapter = PersistenceAdapter::new(storage.clone(), "work");

        assert_eq!(adapter.load_next_id(), None);
        adapter.save_next_id(12);

        assert_eq!(adapter.next_id_key(), "work.next_id");
        assert_eq!(storage.raw("work.next_id").as_deref(), Some("12"));
        assert_eq!(adapter.load_next_id(), Some(12));
        assert_eq!(storage.raw("work"), None);
    }

    #[test]
    fn unusable_next_id_is_ignored() {
        let storage = InMemoryKeyValueStore::with_slot("todos.next_id", "-3");
        let adapter = PersistenceAdapter::new(storage, "todos");

        assert!(adapter.try_load_next_id().is_err());
        assert_eq!(adapter.load_next_id(), None);
    }

    #[test]
    fn empty_array_is_a_valid_list() {
        let adapter =
            PersistenceAdapter::new(InMemoryKeyValueStore::with_slot("todos", "[]"), "todos");
        assert!(adapter.load().is_empty());
    }

    #[test]
    fn unavailable_storage_loads_defaults_and_swallows_saves() {
        let storage = FailingKeyValueStore::unavailable();
        let adapter = PersistenceAdapter::new(storage.clone(), "todos");

        assert_eq!(adapter.load(), default_collection());
        adapter.save(&sample());
        assert!(matches!(
            adapter.try_save(&sample()),
            Err(PersistenceError::Storage(StorageError::Unavailable(_)))
        ));
        assert_eq!(storage.attempts(), 3);
    }

    #[test]
    fn clear_removes_slot() {
        let storage = InMemoryKeyValueStore::new();
        let adapter = PersistenceAdapter::new(storage.clone(), "todos");
        adapter.save(&sample());
        adapter.save_next_id(6);

        adapter.clear().unwrap();

        assert!(storage.is_empty());
    }
}
