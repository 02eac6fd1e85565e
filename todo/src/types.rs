//! Domain types for the todo list.
//!
//! A todo list is an ordered collection of items that can be added, edited,
//! toggled, and deleted, plus at most one ephemeral edit session pointing
//! at the item currently being edited.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unique identifier for a todo item
///
/// Persisted lists may carry any JSON number or a string as an id; all of
/// them round-trip. Non-negative integers always deserialize as
/// [`TodoId::Number`], never as [`TodoId::OtherNumber`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TodoId {
    /// Numeric id, as produced by the sequential generator
    Number(u64),
    /// Any other JSON number (negative, fractional, or beyond `u64`)
    OtherNumber(serde_json::Number),
    /// Opaque string id, as produced by the UUID generator
    Text(String),
}

impl TodoId {
    /// Returns the value of a non-negative integer id
    #[must_use]
    pub const fn as_number(&self) -> Option<u64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::OtherNumber(_) | Self::Text(_) => None,
        }
    }
}

impl From<u64> for TodoId {
    fn from(n: u64) -> Self {
        Self::Number(n)
    }
}

impl From<serde_json::Number> for TodoId {
    fn from(n: serde_json::Number) -> Self {
        n.as_u64().map_or(Self::OtherNumber(n), Self::Number)
    }
}

impl From<&str> for TodoId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl std::fmt::Display for TodoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => std::fmt::Display::fmt(n, f),
            Self::OtherNumber(n) => f.pad(&n.to_string()),
            Self::Text(s) => f.pad(s),
        }
    }
}

/// Trim `text`, returning `None` if nothing is left
#[must_use]
pub fn normalize_text(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// A single todo item
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    /// Unique identifier
    pub id: TodoId,
    /// Trimmed, non-empty content
    pub text: String,
    /// Whether the todo is completed
    pub done: bool,
}

impl TodoItem {
    /// Creates a new, not yet completed, todo item
    #[must_use]
    pub const fn new(id: TodoId, text: String) -> Self {
        Self {
            id,
            text,
            done: false,
        }
    }
}

/// Ways a list of items can break the collection invariants
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollectionError {
    /// Two items share an id
    #[error("duplicate todo id {0}")]
    DuplicateId(TodoId),

    /// An item's text is empty or not trimmed
    #[error("todo {0} has blank or untrimmed text")]
    InvalidText(TodoId),
}

/// Ordered todo items with pairwise distinct ids and non-blank text
///
/// Serializes as a plain JSON array. Deserializing checks the invariants, so
/// a stored list with duplicate ids or blank text is rejected as a whole.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TodoItem>", into = "Vec<TodoItem>")]
pub struct TodoCollection {
    items: Vec<TodoItem>,
}

impl TodoCollection {
    /// Creates an empty collection
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Builds a collection, checking the invariants
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError`] if ids repeat or any text is blank or
    /// carries surrounding whitespace.
    pub fn from_items(items: Vec<TodoItem>) -> Result<Self, CollectionError> {
        let mut seen = std::collections::HashSet::with_capacity(items.len());
        for item in &items {
            if item.text.is_empty() || item.text.trim() != item.text {
                return Err(CollectionError::InvalidText(item.id.clone()));
            }
            if !seen.insert(&item.id) {
                return Err(CollectionError::DuplicateId(item.id.clone()));
            }
        }
        Ok(Self { items })
    }

    /// Returns the number of todos
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if there are no todos
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of completed todos
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.items.iter().filter(|t| t.done).count()
    }

    /// Items in display order
    #[must_use]
    pub fn items(&self) -> &[TodoItem] {
        &self.items
    }

    /// Iterates items in display order
    pub fn iter(&self) -> std::slice::Iter<'_, TodoItem> {
        self.items.iter()
    }

    /// Returns a todo by ID
    #[must_use]
    pub fn get(&self, id: &TodoId) -> Option<&TodoItem> {
        self.items.iter().find(|t| &t.id == id)
    }

    /// Checks if a todo exists
    #[must_use]
    pub fn contains(&self, id: &TodoId) -> bool {
        self.get(id).is_some()
    }

    /// Position of a todo in display order
    #[must_use]
    pub fn position(&self, id: &TodoId) -> Option<usize> {
        self.items.iter().position(|t| &t.id == id)
    }

    /// Largest numeric id present, if any
    #[must_use]
    pub fn max_numeric_id(&self) -> Option<u64> {
        self.items.iter().filter_map(|t| t.id.as_number()).max()
    }

    pub(crate) fn get_mut(&mut self, id: &TodoId) -> Option<&mut TodoItem> {
        self.items.iter_mut().find(|t| &t.id == id)
    }

    pub(crate) fn push(&mut self, item: TodoItem) {
        self.items.push(item);
    }

    pub(crate) fn remove(&mut self, id: &TodoId) -> Option<TodoItem> {
        let index = self.position(id)?;
        Some(self.items.remove(index))
    }
}

impl TryFrom<Vec<TodoItem>> for TodoCollection {
    type Error = CollectionError;

    fn try_from(items: Vec<TodoItem>) -> Result<Self, Self::Error> {
        Self::from_items(items)
    }
}

impl From<TodoCollection> for Vec<TodoItem> {
    fn from(collection: TodoCollection) -> Self {
        collection.items
    }
}

impl<'a> IntoIterator for &'a TodoCollection {
    type Item = &'a TodoItem;
    type IntoIter = std::slice::Iter<'a, TodoItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// The item currently being edited and the text in the input
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditSession {
    /// Item being edited
    pub id: TodoId,
    /// Text currently shown in the input, uncommitted
    pub draft: String,
}

/// State of the todo list
///
/// `todos` is persisted; `edit` lives only for the current session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TodoState {
    /// All todos in display order
    pub todos: TodoCollection,
    /// Active edit session, if any
    pub edit: Option<EditSession>,
}

impl TodoState {
    /// Creates a state with no edit in progress
    #[must_use]
    pub const fn new(todos: TodoCollection) -> Self {
        Self { todos, edit: None }
    }

    /// Returns true while an edit session is active
    #[must_use]
    pub const fn is_editing(&self) -> bool {
        self.edit.is_some()
    }
}

/// Actions representing commands and events for todos
///
/// Commands carry raw user input and are validated by the reducer. Events
/// describe accepted changes; one sent in directly is checked against the
/// same rules before it is applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TodoAction {
    // ========== Commands ==========
    /// Command: Add a todo, or commit the active edit if one is open
    Add {
        /// Raw input text
        text: String,
    },

    /// Command: Begin editing a todo
    StartEdit {
        /// Todo to edit
        id: TodoId,
    },

    /// Command: Replace the draft text of the active edit
    UpdateDraft {
        /// Raw input text
        text: String,
    },

    /// Command: Save the active edit
    CommitEdit {
        /// Raw input text
        text: String,
    },

    /// Command: Abandon the active edit
    CancelEdit,

    /// Command: Flip a todo's completion flag
    Toggle {
        /// Todo to toggle
        id: TodoId,
    },

    /// Command: Remove a todo
    Delete {
        /// Todo to delete
        id: TodoId,
    },

    // ========== Events ==========
    /// Event: Todo was appended
    TodoAdded {
        /// The new item
        item: TodoItem,
    },

    /// Event: Todo text was replaced
    TodoEdited {
        /// Todo identifier
        id: TodoId,
        /// New trimmed text
        text: String,
    },

    /// Event: Todo completion flag was flipped
    TodoToggled {
        /// Todo identifier
        id: TodoId,
    },

    /// Event: Todo was removed
    TodoDeleted {
        /// Todo identifier
        id: TodoId,
    },

    /// Event: An edit session was opened
    EditStarted {
        /// Todo identifier
        id: TodoId,
        /// Initial draft text
        draft: String,
    },

    /// Event: The draft text changed
    DraftUpdated {
        /// New draft text
        text: String,
    },

    /// Event: The edit session was closed
    EditCleared,
}

impl TodoAction {
    /// Returns true if this variant is a command
    #[must_use]
    pub const fn is_command(&self) -> bool {
        matches!(
            self,
            Self::Add { .. }
                | Self::StartEdit { .. }
                | Self::UpdateDraft { .. }
                | Self::CommitEdit { .. }
                | Self::CancelEdit
                | Self::Toggle { .. }
                | Self::Delete { .. }
        )
    }

    /// Returns true if this variant is an event
    #[must_use]
    pub const fn is_event(&self) -> bool {
        !self.is_command()
    }

    /// Returns true if applying this event changes the persisted list
    #[must_use]
    pub const fn changes_collection(&self) -> bool {
        matches!(
            self,
            Self::TodoAdded { .. }
                | Self::TodoEdited { .. }
                | Self::TodoToggled { .. }
                | Self::TodoDeleted { .. }
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code
mod tests {
    use super::*;

    fn item(id: u64, text: &str) -> TodoItem {
        TodoItem::new(TodoId::Number(id), text.to_string())
    }

    #[test]
    fn todo_id_display() {
        assert_eq!(TodoId::Number(7).to_string(), "7");
        assert_eq!(TodoId::from("abc").to_string(), "abc");
    }

    #[test]
    fn todo_id_accepts_numbers_and_strings() {
        let ids: Vec<TodoId> = serde_json::from_str(r#"[1, "two", 1712345678901]"#).unwrap();
        assert_eq!(
            ids,
            vec![
                TodoId::Number(1),
                TodoId::Text("two".into()),
                TodoId::Number(1_712_345_678_901)
            ]
        );
    }

    #[test]
    fn todo_id_keeps_numbers_outside_u64() {
        let ids: Vec<TodoId> = serde_json::from_str("[-1, 1712345678901.5, 1e3, 7]").unwrap();

        assert_eq!(ids[0], TodoId::OtherNumber(serde_json::Number::from(-1)));
        assert!(matches!(ids[1], TodoId::OtherNumber(_)));
        assert!(matches!(ids[2], TodoId::OtherNumber(_)));
        assert_eq!(ids[3], TodoId::Number(7));
        assert_eq!(ids[0].as_number(), None);
        assert_eq!(
            serde_json::to_string(&ids).unwrap(),
            "[-1,1712345678901.5,1000.0,7]"
        );
        assert_eq!(ids[1].to_string(), "1712345678901.5");
    }

    #[test]
    fn todo_id_from_json_number_prefers_plain_numbers() {
        assert_eq!(TodoId::from(serde_json::Number::from(5u64)), TodoId::Number(5));
        assert_eq!(
            TodoId::from(serde_json::Number::from(-5)),
            TodoId::OtherNumber(serde_json::Number::from(-5))
        );
    }

    #[test]
    fn normalize_text_trims_and_rejects_blank() {
        assert_eq!(normalize_text("  hi  ").as_deref(), Some("hi"));
        assert_eq!(normalize_text(" \t\n"), None);
        assert_eq!(normalize_text(""), None);
    }

    #[test]
    fn todo_item_new_is_not_done() {
        let item = item(1, "Test todo");
        assert_eq!(item.id, TodoId::Number(1));
        assert!(!item.done);
    }

    #[test]
    fn collection_rejects_duplicate_ids() {
        let result = TodoCollection::from_items(vec![item(1, "a"), item(1, "b")]);
        assert_eq!(result, Err(CollectionError::DuplicateId(TodoId::Number(1))));
    }

    #[test]
    fn collection_rejects_blank_and_untrimmed_text() {
        assert_eq!(
            TodoCollection::from_items(vec![item(1, "   ")]),
            Err(CollectionError::InvalidText(TodoId::Number(1)))
        );
        assert_eq!(
            TodoCollection::from_items(vec![item(2, " padded ")]),
            Err(CollectionError::InvalidText(TodoId::Number(2)))
        );
    }

    #[test]
    fn collection_serializes_as_plain_array() {
        let collection = TodoCollection::from_items(vec![item(1, "a")]).unwrap();
        let json = serde_json::to_string(&collection).unwrap();
        assert_eq!(json, r#"[{"id":1,"text":"a","done":false}]"#);
    }

    #[test]
    fn collection_deserialize_enforces_invariants() {
        let duplicate = r#"[{"id":1,"text":"a","done":false},{"id":1,"text":"b","done":true}]"#;
        let error = serde_json::from_str::<TodoCollection>(duplicate).unwrap_err();
        assert!(error.to_string().contains("duplicate todo id 1"));
    }

    #[test]
    fn collection_lookup_and_removal_keep_order() {
        let mut collection =
            TodoCollection::from_items(vec![item(1, "a"), item(2, "b"), item(3, "c")]).unwrap();

        assert_eq!(collection.position(&TodoId::Number(3)), Some(2));
        assert_eq!(collection.max_numeric_id(), Some(3));

        let removed = collection.remove(&TodoId::Number(2)).unwrap();
        assert_eq!(removed.text, "b");
        let texts: Vec<&str> = collection.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "c"]);
        assert_eq!(collection.remove(&TodoId::Number(2)), None);
    }

    #[test]
    fn action_kinds() {
        assert!(TodoAction::Add { text: "x".into() }.is_command());
        assert!(TodoAction::CancelEdit.is_command());
        assert!(TodoAction::EditCleared.is_event());

        let toggled = TodoAction::TodoToggled { id: 1.into() };
        assert!(toggled.is_event());
        assert!(toggled.changes_collection());
        assert!(!TodoAction::DraftUpdated { text: String::new() }.changes_collection());
    }
}
