//! Todo list store with single-item editing and key-value persistence.
//!
//! The list is an ordered collection of items, each with a unique id, a
//! non-blank text, and a completion flag. Items are added, toggled, edited,
//! and deleted through a [`TodoStore`], which also tracks at most one open
//! edit session. After every change to the list the store writes the whole
//! list to a key-value slot; on startup it reads it back.
//!
//! - Typed domain model (`TodoItem`, `TodoCollection`, `EditSession`)
//! - Command validation and event application in [`TodoReducer`]
//! - Persistence as an explicit effect, never inside the reducer
//! - Configuration from environment variables
//!
//! # Quick Start
//!
//! ```no_run
//! use todo::{TodoConfig, TodoId, TodoStore};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = TodoConfig::from_env()?;
//! let mut store = TodoStore::from_config(&config);
//!
//! store.add("Buy milk");
//! store.toggle(&TodoId::Number(1));
//!
//! for todo in store.collection() {
//!     println!("[{}] {}", if todo.done { "x" } else { " " }, todo.text);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod ids;
pub mod persistence;
pub mod reducer;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use config::{ConfigError, TodoConfig};
pub use ids::{IdGenerator, IdStrategy};
pub use persistence::{PersistenceAdapter, PersistenceError, default_collection};
pub use reducer::{TodoEnvironment, TodoReducer};
pub use store::TodoStore;
pub use types::{EditSession, TodoAction, TodoCollection, TodoId, TodoItem, TodoState};
