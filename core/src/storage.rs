//! Key-value storage abstraction for durable slots.
//!
//! A [`KeyValueStore`] is the opaque persistence service the domain writes
//! its snapshots to. It knows nothing about the values it holds: each key
//! names a slot, each slot holds one serialized string, and a write replaces
//! whatever the slot held before.
//!
//! # Implementations
//!
//! - `FileKeyValueStore` (in `tasklist-runtime`): one file per slot
//! - `InMemoryKeyValueStore` (in `tasklist-testing`): fast, deterministic testing
//! - `FailingKeyValueStore` (in `tasklist-testing`): simulates an unavailable backend
//!
//! # Example
//!
//! ```
//! use tasklist_core::storage::{KeyValueStore, StorageError};
//! use std::cell::RefCell;
//! use std::collections::HashMap;
//!
//! #[derive(Default)]
//! struct MapStore(RefCell<HashMap<String, String>>);
//!
//! impl KeyValueStore for MapStore {
//!     fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
//!         Ok(self.0.borrow().get(key).cloned())
//!     }
//!
//!     fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
//!         self.0.borrow_mut().insert(key.to_string(), value.to_string());
//!         Ok(())
//!     }
//!
//!     fn remove(&self, key: &str) -> Result<(), StorageError> {
//!         self.0.borrow_mut().remove(key);
//!         Ok(())
//!     }
//! }
//!
//! let store = MapStore::default();
//! store.set("todos", "[]").unwrap();
//! assert_eq!(store.get("todos").unwrap().as_deref(), Some("[]"));
//! ```

use thiserror::Error;

/// Errors that can occur at the storage boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The backend cannot be reached or is disabled.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// The write would exceed the backend's capacity.
    #[error("Storage quota exceeded: {needed} bytes requested, {limit} bytes allowed")]
    QuotaExceeded {
        /// Size of the rejected write in bytes.
        needed: usize,
        /// Configured capacity in bytes.
        limit: usize,
    },

    /// The slot exists but its bytes could not be read as text.
    #[error("Corrupt slot {key}: {reason}")]
    Corrupt {
        /// The slot that failed to decode.
        key: String,
        /// What went wrong.
        reason: String,
    },

    /// General I/O error.
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for StorageError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}

/// Named durable slots holding serialized strings.
///
/// Implementations take `&self`; backends that need mutation use interior
/// mutability so one store can be shared by the adapter and by tests.
pub trait KeyValueStore {
    /// Read the value stored under `key`.
    ///
    /// Returns `Ok(None)` if the slot has never been written.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write `value` under `key`, replacing any prior value.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the write is rejected or fails.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove the slot under `key`. Removing a missing slot is not an error.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend cannot be modified.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
