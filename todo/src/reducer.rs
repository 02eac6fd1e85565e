//! Reducer logic for the todo list.
//!
//! Commands are validated against the current state and turned into events;
//! events are applied to state. Events sent in directly go through the same
//! checks as the commands that would have produced them. Blank text and
//! unknown ids are not errors: the action is dropped and the state is left
//! alone. Every event that changes the list returns an effect that writes
//! the new list to storage.

use crate::ids::IdGenerator;
use crate::persistence::PersistenceAdapter;
use crate::types::{EditSession, TodoAction, TodoId, TodoItem, TodoState, normalize_text};
use std::rc::Rc;
use tasklist_core::{SmallVec, effect::Effect, reducer::Reducer, smallvec};

type Effects = SmallVec<[Effect<TodoAction>; 4]>;

/// Environment dependencies for the todo reducer
#[derive(Clone)]
pub struct TodoEnvironment {
    /// Source of ids for new todos
    pub ids: Rc<dyn IdGenerator>,
    /// Where the list is written after each change
    pub persistence: Rc<PersistenceAdapter>,
}

impl TodoEnvironment {
    /// Creates a new `TodoEnvironment`
    #[must_use]
    pub fn new(ids: Rc<dyn IdGenerator>, persistence: Rc<PersistenceAdapter>) -> Self {
        Self { ids, persistence }
    }
}

/// Reducer for the todo list
#[derive(Clone, Debug, Default)]
pub struct TodoReducer;

impl TodoReducer {
    /// Creates a new `TodoReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Validates an `Add` command with no edit in progress
    fn validate_add(state: &TodoState, text: &str, env: &TodoEnvironment) -> Option<TodoAction> {
        let Some(text) = normalize_text(text) else {
            tracing::debug!("Ignoring add with blank text");
            return None;
        };

        let id = env.ids.next_id();
        if state.todos.contains(&id) {
            tracing::warn!(%id, "Id generator returned an id already in use, ignoring add");
            return None;
        }

        Some(TodoAction::TodoAdded {
            item: TodoItem::new(id, text),
        })
    }

    /// Validates a `CommitEdit` command
    fn validate_commit(state: &TodoState, text: &str) -> Option<TodoAction> {
        let Some(session) = &state.edit else {
            tracing::debug!("Ignoring commit with no edit in progress");
            return None;
        };

        let Some(text) = normalize_text(text) else {
            tracing::debug!(id = %session.id, "Ignoring commit with blank text, edit stays open");
            return None;
        };

        Some(TodoAction::TodoEdited {
            id: session.id.clone(),
            text,
        })
    }

    /// Validates a command that names an existing todo
    fn require_existing(state: &TodoState, id: &TodoId, command: &str) -> bool {
        let found = state.todos.contains(id);
        if !found {
            tracing::debug!(%id, command, "Ignoring command for unknown todo");
        }
        found
    }

    /// Checks an event sent from outside against the rules of its command
    fn validate_event(state: &TodoState, event: TodoAction) -> Option<TodoAction> {
        match event {
            TodoAction::TodoAdded { item } => {
                let Some(text) = normalize_text(&item.text) else {
                    tracing::debug!(id = %item.id, "Ignoring added todo with blank text");
                    return None;
                };
                if state.todos.contains(&item.id) {
                    tracing::debug!(id = %item.id, "Ignoring added todo with an id already in use");
                    return None;
                }
                Some(TodoAction::TodoAdded {
                    item: TodoItem { text, ..item },
                })
            },
            TodoAction::TodoEdited { id, text } => {
                let Some(text) = normalize_text(&text) else {
                    tracing::debug!(%id, "Ignoring edit with blank text");
                    return None;
                };
                Self::require_existing(state, &id, "edit")
                    .then_some(TodoAction::TodoEdited { id, text })
            },
            TodoAction::TodoToggled { id } => Self::require_existing(state, &id, "toggle")
                .then_some(TodoAction::TodoToggled { id }),
            TodoAction::TodoDeleted { id } => Self::require_existing(state, &id, "delete")
                .then_some(TodoAction::TodoDeleted { id }),
            TodoAction::EditStarted { id, draft } => {
                Self::require_existing(state, &id, "start edit")
                    .then_some(TodoAction::EditStarted { id, draft })
            },
            TodoAction::DraftUpdated { text } => {
                state.is_editing().then_some(TodoAction::DraftUpdated { text })
            },
            TodoAction::EditCleared => state.is_editing().then_some(TodoAction::EditCleared),
            TodoAction::Add { .. }
            | TodoAction::StartEdit { .. }
            | TodoAction::UpdateDraft { .. }
            | TodoAction::CommitEdit { .. }
            | TodoAction::CancelEdit
            | TodoAction::Toggle { .. }
            | TodoAction::Delete { .. } => None,
        }
    }

    /// Applies an event to state
    fn apply_event(state: &mut TodoState, action: &TodoAction) {
        match action {
            TodoAction::TodoAdded { item } => {
                if !state.todos.contains(&item.id) {
                    state.todos.push(item.clone());
                }
            },
            TodoAction::TodoEdited { id, text } => {
                if let Some(todo) = state.todos.get_mut(id) {
                    todo.text.clone_from(text);
                }
                if state.edit.as_ref().is_some_and(|session| &session.id == id) {
                    state.edit = None;
                }
            },
            TodoAction::TodoToggled { id } => {
                if let Some(todo) = state.todos.get_mut(id) {
                    todo.done = !todo.done;
                }
            },
            TodoAction::TodoDeleted { id } => {
                state.todos.remove(id);
                if state.edit.as_ref().is_some_and(|session| &session.id == id) {
                    state.edit = None;
                }
            },
            TodoAction::EditStarted { id, draft } => {
                state.edit = Some(EditSession {
                    id: id.clone(),
                    draft: draft.clone(),
                });
            },
            TodoAction::DraftUpdated { text } => {
                if let Some(session) = &mut state.edit {
                    session.draft.clone_from(text);
                }
            },
            TodoAction::EditCleared => {
                state.edit = None;
            },
            // Commands are not applied to state
            TodoAction::Add { .. }
            | TodoAction::StartEdit { .. }
            | TodoAction::UpdateDraft { .. }
            | TodoAction::CommitEdit { .. }
            | TodoAction::CancelEdit
            | TodoAction::Toggle { .. }
            | TodoAction::Delete { .. } => {},
        }
    }

    /// Applies an accepted event and describes the follow-up write
    ///
    /// A delete also stores the id high-water mark, written before the list
    /// so that a stored list never lacks an id the mark does not cover.
    fn accept(state: &mut TodoState, event: &TodoAction, env: &TodoEnvironment) -> Effects {
        Self::apply_event(state, event);

        if let TodoAction::TodoAdded { item } = event {
            env.ids.observe(&item.id);
        }

        if !event.changes_collection() {
            return SmallVec::new();
        }

        let next_id = if matches!(event, TodoAction::TodoDeleted { .. }) {
            env.ids.high_water()
        } else {
            None
        };
        let persistence = Rc::clone(&env.persistence);
        let snapshot = state.todos.clone();
        smallvec![Effect::run(move || {
            if let Some(next) = next_id {
                persistence.save_next_id(next);
            }
            persistence.save(&snapshot);
            None
        })]
    }
}

impl Reducer for TodoReducer {
    type State = TodoState;
    type Action = TodoAction;
    type Environment = TodoEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> Effects {
        let event = match action {
            // ========== Commands ==========
            TodoAction::Add { text } => {
                // With an edit open, the input is the edited text
                if state.is_editing() {
                    Self::validate_commit(state, &text)
                } else {
                    Self::validate_add(state, &text, env)
                }
            },

            TodoAction::CommitEdit { text } => Self::validate_commit(state, &text),

            TodoAction::StartEdit { id } => state.todos.get(&id).map(|todo| {
                TodoAction::EditStarted {
                    id: todo.id.clone(),
                    draft: todo.text.clone(),
                }
            }),

            TodoAction::UpdateDraft { text } => {
                state.is_editing().then_some(TodoAction::DraftUpdated { text })
            },

            TodoAction::CancelEdit => state.is_editing().then_some(TodoAction::EditCleared),

            TodoAction::Toggle { id } => Self::require_existing(state, &id, "toggle")
                .then_some(TodoAction::TodoToggled { id }),

            TodoAction::Delete { id } => Self::require_existing(state, &id, "delete")
                .then_some(TodoAction::TodoDeleted { id }),

            // ========== Events ==========
            event => Self::validate_event(state, event),
        };

        match event {
            Some(event) => {
                tracing::debug!(?event, "Accepted");
                Self::accept(state, &event, env)
            },
            None => SmallVec::new(),
        }
    }
}
