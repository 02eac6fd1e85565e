//! `TodoStore`: the todo list plus its edit session, behind one owner.
//!
//! Each operation sends one command through the reducer and hands back the
//! resulting snapshot for the caller to render. Writes to storage happen as
//! effects after the in-memory change is in place.

use crate::config::TodoConfig;
use crate::ids::{IdGenerator, IdStrategy, MonotonicIdGenerator, UuidIdGenerator};
use crate::persistence::PersistenceAdapter;
use crate::reducer::{TodoEnvironment, TodoReducer};
use crate::types::{EditSession, TodoAction, TodoCollection, TodoId, TodoState};
use std::rc::Rc;
use tasklist_core::storage::KeyValueStore;
use tasklist_runtime::{FileKeyValueStore, Store};

/// Owns the todo list and edit session for one session of use
///
/// # Example
///
/// ```
/// use tasklist_testing::InMemoryKeyValueStore;
/// use todo::{IdStrategy, PersistenceAdapter, TodoId, TodoStore};
///
/// let storage = InMemoryKeyValueStore::new();
/// let mut store = TodoStore::hydrate(
///     PersistenceAdapter::new(storage.clone(), "todos"),
///     IdStrategy::Sequential,
/// );
///
/// store.toggle(&TodoId::Number(1));
/// let todos = store.add("Write tests");
/// assert_eq!(todos.len(), 3);
/// assert_eq!(storage.write_count(), 2);
/// ```
pub struct TodoStore {
    inner: Store<TodoState, TodoAction, TodoEnvironment, TodoReducer>,
}

impl std::fmt::Debug for TodoStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoStore")
            .field("state", self.inner.current())
            .finish_non_exhaustive()
    }
}

impl TodoStore {
    /// Load the list through `persistence` and build a store around it
    ///
    /// Falls back to the starter list when nothing usable is stored.
    #[must_use]
    pub fn hydrate(persistence: PersistenceAdapter, id_strategy: IdStrategy) -> Self {
        let todos = persistence.load();
        let ids: Rc<dyn IdGenerator> = match id_strategy {
            IdStrategy::Sequential => Rc::new(MonotonicIdGenerator::resume(
                &todos,
                persistence.load_next_id(),
            )),
            IdStrategy::Uuid => Rc::new(UuidIdGenerator),
        };
        tracing::info!(count = todos.len(), ?id_strategy, "Todo store hydrated");

        Self::with_environment(
            TodoState::new(todos),
            TodoEnvironment::new(ids, Rc::new(persistence)),
        )
    }

    /// Build a store backed by the storage described in `config`
    #[must_use]
    pub fn from_config(config: &TodoConfig) -> Self {
        let mut storage = FileKeyValueStore::new(&config.storage_dir);
        if let Some(quota) = config.storage_quota_bytes {
            storage = storage.with_quota(quota);
        }
        Self::with_storage(storage, config)
    }

    /// Build a store over any key-value backend, using the key and id
    /// strategy from `config`
    #[must_use]
    pub fn with_storage(storage: impl KeyValueStore + 'static, config: &TodoConfig) -> Self {
        Self::hydrate(
            PersistenceAdapter::new(storage, config.storage_key.clone()),
            config.id_strategy,
        )
    }

    /// Build a store from explicit state and dependencies
    ///
    /// An edit session on an id that is not in the list is dropped.
    #[must_use]
    pub fn with_environment(mut state: TodoState, environment: TodoEnvironment) -> Self {
        if let Some(session) = state.edit.take_if(|session| !state.todos.contains(&session.id)) {
            tracing::warn!(id = %session.id, "Dropping edit session for a todo not in the list");
        }
        Self {
            inner: Store::new(state, TodoReducer::new(), environment),
        }
    }

    /// Add a todo with `text`, or commit the open edit with it
    ///
    /// Blank text is ignored. While an edit session is open this behaves
    /// exactly like [`commit_edit`](Self::commit_edit).
    pub fn add(&mut self, text: &str) -> &TodoCollection {
        &self
            .send(TodoAction::Add {
                text: text.to_string(),
            })
            .todos
    }

    /// Open an edit session on `id`, replacing any open session
    ///
    /// Unknown ids are ignored.
    pub fn start_edit(&mut self, id: &TodoId) -> Option<&EditSession> {
        self.send(TodoAction::StartEdit { id: id.clone() }).edit.as_ref()
    }

    /// Replace the draft text of the open edit session
    pub fn update_draft(&mut self, text: &str) -> Option<&EditSession> {
        self.send(TodoAction::UpdateDraft {
            text: text.to_string(),
        })
        .edit
        .as_ref()
    }

    /// Save `text` to the item being edited and close the session
    ///
    /// Ignored with no open session. Blank text is ignored and leaves the
    /// session open.
    pub fn commit_edit(&mut self, text: &str) -> &TodoCollection {
        &self
            .send(TodoAction::CommitEdit {
                text: text.to_string(),
            })
            .todos
    }

    /// Close the edit session without changing any item
    pub fn cancel_edit(&mut self) {
        self.send(TodoAction::CancelEdit);
    }

    /// Flip the completion flag of `id`
    pub fn toggle(&mut self, id: &TodoId) -> &TodoCollection {
        &self.send(TodoAction::Toggle { id: id.clone() }).todos
    }

    /// Remove `id`, closing the edit session if it was on that item
    pub fn delete(&mut self, id: &TodoId) -> &TodoCollection {
        &self.send(TodoAction::Delete { id: id.clone() }).todos
    }

    /// Current list in display order
    #[must_use]
    pub fn collection(&self) -> &TodoCollection {
        &self.inner.current().todos
    }

    /// Current edit session, if one is open
    #[must_use]
    pub fn edit_session(&self) -> Option<&EditSession> {
        self.inner.current().edit.as_ref()
    }

    /// Full current state
    #[must_use]
    pub fn state(&self) -> &TodoState {
        self.inner.current()
    }

    /// Send any action through the reducer
    ///
    /// Events are checked against the same rules as the commands that
    /// produce them, and accepted ones are written to storage.
    pub fn send(&mut self, action: TodoAction) -> &TodoState {
        if let Err(error) = self.inner.send(action) {
            tracing::error!(%error, "Todo action aborted");
        }
        self.inner.current()
    }
}
