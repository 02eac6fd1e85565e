//! The todo store over real files: survival across sessions, corruption,
//! and quota handling.

#![allow(clippy::unwrap_used)] // Test code

use std::fs;
use todo::{TodoConfig, TodoId, TodoStore, default_collection};

fn config_in(dir: &std::path::Path) -> TodoConfig {
    TodoConfig {
        storage_dir: dir.to_path_buf(),
        ..TodoConfig::default()
    }
}

#[test]
fn list_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());

    let mut first = TodoStore::from_config(&config);
    first.add("Persist me");
    first.toggle(&TodoId::Number(2));
    let expected = first.collection().clone();
    drop(first);

    let second = TodoStore::from_config(&config);
    assert_eq!(second.collection(), &expected);

    let raw = fs::read_to_string(dir.path().join("todos.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value[2]["text"], "Persist me");
    assert_eq!(value[1]["done"], true);
}

#[test]
fn corrupt_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("todos.json"), "{ not a list").unwrap();

    let store = TodoStore::from_config(&config_in(dir.path()));

    assert_eq!(store.collection(), &default_collection());
}

#[test]
fn quota_failure_keeps_memory_and_old_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(dir.path());

    TodoStore::from_config(&config).toggle(&TodoId::Number(1));
    let on_disk = fs::read_to_string(dir.path().join("todos.json")).unwrap();

    config.storage_quota_bytes = Some(on_disk.len());
    let mut store = TodoStore::from_config(&config);
    let todos = store.add("This write is too big for the quota");

    assert_eq!(todos.len(), 3);
    assert_eq!(
        fs::read_to_string(dir.path().join("todos.json")).unwrap(),
        on_disk
    );
}

#[test]
fn custom_key_uses_its_own_slot() {
    let dir = tempfile::tempdir().unwrap();
    let config = TodoConfig {
        storage_key: "work".into(),
        ..config_in(dir.path())
    };

    TodoStore::from_config(&config).add("Only in work");

    assert!(dir.path().join("work.json").exists());
    assert!(!dir.path().join("todos.json").exists());
}

#[test]
fn deleted_id_stays_retired_across_restarts() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());

    let mut first = TodoStore::from_config(&config);
    let temp = first.add("first").items()[2].id.clone();
    first.delete(&temp);
    drop(first);

    let mut second = TodoStore::from_config(&config);
    let next = second.add("second").items()[2].id.clone();

    assert_ne!(next, temp);
    assert!(dir.path().join("todos.next_id.json").exists());
}

#[test]
fn unusual_numeric_ids_are_kept() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("todos.json"),
        r#"[{"id":-1,"text":"Old","done":false},{"id":2.5,"text":"Older","done":true}]"#,
    )
    .unwrap();

    let mut store = TodoStore::from_config(&config_in(dir.path()));
    store.toggle(&TodoId::OtherNumber(serde_json::Number::from(-1)));

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("todos.json")).unwrap()).unwrap();
    assert_eq!(value[0]["id"], -1);
    assert_eq!(value[0]["done"], true);
    assert_eq!(value[1]["id"], 2.5);
    assert_eq!(value[1]["text"], "Older");
}
