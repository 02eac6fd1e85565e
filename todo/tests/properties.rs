//! Property tests for the todo store's invariants.

#![allow(clippy::unwrap_used)] // Test code

use proptest::prelude::*;
use std::collections::HashSet;
use tasklist_testing::InMemoryKeyValueStore;
use tasklist_testing::properties::{blank_text, non_blank_text};
use todo::{
    IdStrategy, PersistenceAdapter, TodoCollection, TodoId, TodoItem, TodoStore,
};

fn empty_store() -> TodoStore {
    TodoStore::hydrate(
        PersistenceAdapter::new(InMemoryKeyValueStore::with_slot("todos", "[]"), "todos"),
        IdStrategy::Sequential,
    )
}

fn store_with(texts: &[String]) -> TodoStore {
    let mut store = empty_store();
    for text in texts {
        store.add(text);
    }
    store
}

fn arbitrary_collection() -> impl Strategy<Value = TodoCollection> {
    prop::collection::vec((non_blank_text(), any::<bool>(), any::<bool>()), 0..12).prop_map(
        |entries| {
            let items = entries
                .into_iter()
                .enumerate()
                .map(|(index, (text, done, string_id))| {
                    let id = if string_id {
                        TodoId::Text(format!("id-{index}"))
                    } else {
                        TodoId::Number(index as u64 * 10)
                    };
                    let mut item = TodoItem::new(id, text.trim().to_string());
                    item.done = done;
                    item
                })
                .collect();
            TodoCollection::from_items(items).unwrap()
        },
    )
}

proptest! {
    #[test]
    fn adds_grow_list_with_distinct_ids(
        inputs in prop::collection::vec(prop_oneof![non_blank_text(), blank_text()], 0..30)
    ) {
        let store = store_with(&inputs);
        let expected = inputs.iter().filter(|t| !t.trim().is_empty()).count();

        prop_assert_eq!(store.collection().len(), expected);
        let ids: HashSet<&TodoId> = store.collection().iter().map(|t| &t.id).collect();
        prop_assert_eq!(ids.len(), expected);
        for todo in store.collection() {
            prop_assert_eq!(todo.text.trim(), todo.text.as_str());
            prop_assert!(!todo.done);
        }
    }

    #[test]
    fn toggle_twice_is_identity(texts in prop::collection::vec(non_blank_text(), 1..10), pick in any::<prop::sample::Index>()) {
        let mut store = store_with(&texts);
        let before = store.collection().clone();
        let id = before.items()[pick.index(before.len())].id.clone();

        let once = store.toggle(&id).clone();
        prop_assert_ne!(&once, &before);
        prop_assert_eq!(store.toggle(&id), &before);
    }

    #[test]
    fn delete_removes_exactly_one_and_keeps_order(texts in prop::collection::vec(non_blank_text(), 1..10), pick in any::<prop::sample::Index>()) {
        let mut store = store_with(&texts);
        let before = store.collection().clone();
        let index = pick.index(before.len());
        let id = before.items()[index].id.clone();

        let after = store.delete(&id).clone();

        let mut expected: Vec<TodoItem> = before.items().to_vec();
        expected.remove(index);
        prop_assert_eq!(after.items(), expected.as_slice());

        // Deleting again is a no-op
        prop_assert_eq!(store.delete(&id), &after);
    }

    #[test]
    fn edit_changes_only_text(texts in prop::collection::vec(non_blank_text(), 1..10), pick in any::<prop::sample::Index>(), new_text in non_blank_text()) {
        let mut store = store_with(&texts);
        let index = pick.index(texts.len());
        let id = store.collection().items()[index].id.clone();
        store.toggle(&id);
        let before = store.collection().clone();

        store.start_edit(&id);
        let after = store.commit_edit(&new_text).clone();

        prop_assert_eq!(after.len(), before.len());
        for (i, (old, new)) in before.iter().zip(after.iter()).enumerate() {
            prop_assert_eq!(&old.id, &new.id);
            prop_assert_eq!(old.done, new.done);
            if i == index {
                prop_assert_eq!(new.text.as_str(), new_text.trim());
            } else {
                prop_assert_eq!(&old.text, &new.text);
            }
        }
        prop_assert!(store.edit_session().is_none());
    }

    #[test]
    fn cancel_edit_changes_nothing(texts in prop::collection::vec(non_blank_text(), 1..10), pick in any::<prop::sample::Index>(), draft in ".{0,20}") {
        let mut store = store_with(&texts);
        let before = store.collection().clone();
        let id = before.items()[pick.index(before.len())].id.clone();

        store.start_edit(&id);
        store.update_draft(&draft);
        store.cancel_edit();

        prop_assert_eq!(store.collection(), &before);
        prop_assert!(store.edit_session().is_none());
    }

    #[test]
    fn save_then_load_round_trips(collection in arbitrary_collection()) {
        let adapter = PersistenceAdapter::new(InMemoryKeyValueStore::new(), "todos");

        adapter.try_save(&collection).unwrap();

        prop_assert_eq!(adapter.try_load().unwrap(), Some(collection));
    }
}
