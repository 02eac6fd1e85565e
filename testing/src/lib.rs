//! # Tasklist Testing
//!
//! Testing utilities and helpers for the Tasklist architecture.
//!
//! This crate provides:
//! - [`ReducerTest`]: Given-When-Then harness for reducers
//! - In-memory and failing [`KeyValueStore`](tasklist_core::storage::KeyValueStore) mocks
//! - Property-based testing strategies
//! - Test log initialization
//!
//! ## Example
//!
//! ```ignore
//! use tasklist_testing::{InMemoryKeyValueStore, ReducerTest};
//!
//! #[test]
//! fn add_persists() {
//!     let storage = InMemoryKeyValueStore::new();
//!     let mut store = TodoStore::with_storage(storage.clone(), &TodoConfig::default());
//!
//!     store.add("Buy milk");
//!
//!     assert_eq!(storage.write_count(), 1);
//! }
//! ```

mod storage_mocks;

/// Property-based testing utilities
///
/// Strategies for the text inputs todo operations receive.
pub mod properties {
    use proptest::prelude::*;

    /// Text that still has content after trimming
    ///
    /// May carry leading or trailing whitespace.
    pub fn non_blank_text() -> impl Strategy<Value = String> {
        ("[ \t]{0,3}", "[A-Za-z0-9][A-Za-z0-9 ,.!?-]{0,38}", "[ \t]{0,3}")
            .prop_map(|(lead, body, trail)| format!("{lead}{body}{trail}"))
    }

    /// Text that is empty or whitespace-only
    pub fn blank_text() -> impl Strategy<Value = String> {
        "[ \t\n\r]{0,6}"
    }
}

/// Test helpers and utilities
pub mod helpers {
    /// Install a `tracing` subscriber that writes through the test harness
    ///
    /// Honors `RUST_LOG`; safe to call from every test.
    pub fn init_test_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "warn".into()),
            )
            .with_test_writer()
            .try_init();
    }
}

// Re-export commonly used items
pub use helpers::init_test_tracing;
pub use reducer_test::{ReducerTest, assertions};
pub use storage_mocks::{FailingKeyValueStore, InMemoryKeyValueStore};

#[cfg(test)]
mod tests {
    use super::properties::{blank_text, non_blank_text};
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn non_blank_text_survives_trim(text in non_blank_text()) {
            prop_assert!(!text.trim().is_empty());
        }

        #[test]
        fn blank_text_trims_to_nothing(text in blank_text()) {
            prop_assert!(text.trim().is_empty());
        }
    }

    #[test]
    fn tracing_init_is_repeatable() {
        super::init_test_tracing();
        super::init_test_tracing();
    }
}
