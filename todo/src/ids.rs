//! Identifier generation for new todos.
//!
//! Ids never come from the wall clock: two adds inside the same millisecond
//! must still get different ids. The sequential generator also reports how
//! far it has counted, so the count can be stored and resumed next session.

use crate::types::{TodoCollection, TodoId};
use std::cell::Cell;
use std::str::FromStr;
use thiserror::Error;

/// Source of fresh todo ids
pub trait IdGenerator {
    /// Returns an id that this generator has never returned before
    fn next_id(&self) -> TodoId;

    /// Notes an id that entered the list without coming from this generator
    fn observe(&self, _id: &TodoId) {}

    /// Lowest numeric id that may still be issued, for generators that count
    fn high_water(&self) -> Option<u64> {
        None
    }
}

/// Numeric ids from a counter that only moves forward
///
/// # Example
///
/// ```
/// use todo::ids::{IdGenerator, MonotonicIdGenerator};
/// use todo::TodoId;
///
/// let ids = MonotonicIdGenerator::starting_at(3);
/// assert_eq!(ids.next_id(), TodoId::Number(3));
/// assert_eq!(ids.next_id(), TodoId::Number(4));
/// ```
#[derive(Debug)]
pub struct MonotonicIdGenerator {
    next: Cell<u64>,
}

impl MonotonicIdGenerator {
    /// Start counting at `first`
    #[must_use]
    pub const fn starting_at(first: u64) -> Self {
        Self {
            next: Cell::new(first),
        }
    }

    /// Start above every numeric id already in `todos`
    #[must_use]
    pub fn after(todos: &TodoCollection) -> Self {
        Self::resume(todos, None)
    }

    /// Start above every numeric id in `todos` and at or above `stored_next`,
    /// the high-water mark saved by an earlier session
    #[must_use]
    pub fn resume(todos: &TodoCollection, stored_next: Option<u64>) -> Self {
        let above_list = todos.max_numeric_id().map_or(1, |max| max.saturating_add(1));
        Self::starting_at(above_list.max(stored_next.unwrap_or(1)))
    }
}

impl Default for MonotonicIdGenerator {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl IdGenerator for MonotonicIdGenerator {
    fn next_id(&self) -> TodoId {
        let id = self.next.get();
        self.next.set(id.saturating_add(1));
        TodoId::Number(id)
    }

    fn observe(&self, id: &TodoId) {
        if let Some(n) = id.as_number() {
            if n >= self.next.get() {
                self.next.set(n.saturating_add(1));
            }
        }
    }

    fn high_water(&self) -> Option<u64> {
        Some(self.next.get())
    }
}

/// Random v4 UUID ids, rendered as strings
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn next_id(&self) -> TodoId {
        TodoId::Text(uuid::Uuid::new_v4().to_string())
    }
}

/// Which generator a store is built with
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum IdStrategy {
    /// [`MonotonicIdGenerator`] resumed from the hydrated list and the
    /// stored high-water mark
    #[default]
    Sequential,
    /// [`UuidIdGenerator`]
    Uuid,
}

/// Unrecognized id strategy name
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown id strategy {0:?} (expected \"sequential\" or \"uuid\")")]
pub struct UnknownIdStrategy(pub String);

impl FromStr for IdStrategy {
    type Err = UnknownIdStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequential" | "counter" => Ok(Self::Sequential),
            "uuid" => Ok(Self::Uuid),
            other => Err(UnknownIdStrategy(other.to_string())),
        }
    }
}
