//! Simple CLI demo for the todo store.
//!
//! Hydrates the list from the configured storage directory, walks through
//! add, toggle, edit, and delete, and prints the list after each step. Run
//! it twice to see the list survive between sessions.

use anyhow::Context;
use todo::{TodoCollection, TodoConfig, TodoStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn print_list(title: &str, store: &TodoStore) {
    println!("\n{title}");
    print_todos(store.collection());
    if let Some(session) = store.edit_session() {
        println!("  (editing {}: {:?})", session.id, session.draft);
    }
}

fn print_todos(todos: &TodoCollection) {
    if todos.is_empty() {
        println!("  (empty)");
    }
    for todo in todos {
        let status = if todo.done { "✓" } else { " " };
        println!("  [{status}] {:>4}  {}", todo.id, todo.text);
    }
    println!("  {}/{} done", todos.completed_count(), todos.len());
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todo=info,tasklist_runtime=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tasklist_runtime::metrics::register_metrics();

    let config = TodoConfig::from_env().context("invalid configuration")?;
    println!("=== Todo Example ===");
    println!(
        "Storage: {}/{}.json",
        config.storage_dir.display(),
        config.storage_key
    );

    let mut store = TodoStore::from_config(&config);
    print_list("Loaded:", &store);

    let first = store.collection().items().first().map(|t| t.id.clone());
    let second = store.collection().items().get(1).map(|t| t.id.clone());

    if let Some(id) = &first {
        store.toggle(id);
        print_list(&format!("Toggled {id}:"), &store);
    }

    store.add("Write tests");
    print_list("Added 'Write tests':", &store);

    if let Some(id) = &second {
        store.start_edit(id);
        print_list(&format!("Editing {id}:"), &store);
        store.commit_edit("Build and ship a todo app");
        print_list("Committed edit:", &store);
    }

    if let Some(id) = &first {
        store.delete(id);
        print_list(&format!("Deleted {id}:"), &store);
    }

    println!("\n=== Demo Complete ===");
    Ok(())
}
