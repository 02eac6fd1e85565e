//! In-memory storage testing utilities
//!
//! Provides fast, deterministic stand-ins for durable storage:
//! - [`InMemoryKeyValueStore`]: `HashMap`-based slots with write counting
//! - [`FailingKeyValueStore`]: every operation fails with a chosen error

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity
#![allow(clippy::missing_panics_doc)] // Lock poisoning only happens after a test already panicked

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tasklist_core::storage::{KeyValueStore, StorageError};

/// In-memory key-value store for fast, deterministic testing.
///
/// Clones share the same slots, so a test can hand one clone to the code
/// under test and inspect the other.
///
/// # Example
///
/// ```
/// use tasklist_testing::InMemoryKeyValueStore;
/// use tasklist_core::storage::KeyValueStore;
///
/// let store = InMemoryKeyValueStore::new();
/// store.set("todos", "[]").unwrap();
///
/// assert_eq!(store.raw("todos").as_deref(), Some("[]"));
/// assert_eq!(store.write_count(), 1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct InMemoryKeyValueStore {
    data: Arc<RwLock<HashMap<String, String>>>,
    writes: Arc<RwLock<usize>>,
}

impl InMemoryKeyValueStore {
    /// Create a new empty in-memory store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with one slot already populated
    #[must_use]
    pub fn with_slot(key: &str, value: &str) -> Self {
        let store = Self::new();
        store
            .data
            .write()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        store
    }

    /// Read a slot without going through the trait
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<String> {
        self.data.read().unwrap().get(key).cloned()
    }

    /// Number of successful `set` calls so far
    #[must_use]
    pub fn write_count(&self) -> usize {
        *self.writes.read().unwrap()
    }

    /// Check if the store holds no slots
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.read().unwrap().is_empty()
    }

    /// Clear all slots and the write counter (for test isolation)
    pub fn clear(&self) {
        self.data.write().unwrap().clear();
        *self.writes.write().unwrap() = 0;
    }
}

impl KeyValueStore for InMemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.raw(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.data
            .write()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        *self.writes.write().unwrap() += 1;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.data.write().unwrap().remove(key);
        Ok(())
    }
}

/// A key-value store whose every operation fails.
///
/// Simulates disabled storage, a full quota, or a broken disk.
///
/// # Example
///
/// ```
/// use tasklist_testing::FailingKeyValueStore;
/// use tasklist_core::storage::{KeyValueStore, StorageError};
///
/// let store = FailingKeyValueStore::quota_exceeded();
/// assert!(matches!(
///     store.set("todos", "[]"),
///     Err(StorageError::QuotaExceeded { .. })
/// ));
/// ```
#[derive(Clone, Debug)]
pub struct FailingKeyValueStore {
    error: StorageError,
    attempts: Arc<RwLock<usize>>,
}

impl FailingKeyValueStore {
    /// Fail every call with `error`
    #[must_use]
    pub fn new(error: StorageError) -> Self {
        Self {
            error,
            attempts: Arc::new(RwLock::new(0)),
        }
    }

    /// Storage that is switched off
    #[must_use]
    pub fn unavailable() -> Self {
        Self::new(StorageError::Unavailable("storage disabled".to_string()))
    }

    /// Storage that is full
    #[must_use]
    pub fn quota_exceeded() -> Self {
        Self::new(StorageError::QuotaExceeded {
            needed: 1,
            limit: 0,
        })
    }

    /// Number of calls made so far
    #[must_use]
    pub fn attempts(&self) -> usize {
        *self.attempts.read().unwrap()
    }

    fn fail<T>(&self) -> Result<T, StorageError> {
        *self.attempts.write().unwrap() += 1;
        Err(self.error.clone())
    }
}

impl KeyValueStore for FailingKeyValueStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        self.fail()
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        self.fail()
    }

    fn remove(&self, _key: &str) -> Result<(), StorageError> {
        self.fail()
    }
}
