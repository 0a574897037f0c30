//! End-to-end migration workflow example.
//!
//! Demonstrates the reconcile-then-apply cycle: build a repository of
//! scripts, check what is pending, apply the batch, and confirm the
//! database is up to date afterwards.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p script-migrate-demos --example apply_pending
//! ```

use rusqlite::Connection;
use script_migrate_core::{Script, ScriptRepository};
use script_migrate_sqlite::{ScriptEngine, history};

fn main() {
    // === Step 1: Build a repository of migration scripts ===
    let mut repo = ScriptRepository::new();
    repo.add(Script::new(
        "001_create_users.sql",
        "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT NOT NULL);",
    ));
    repo.add(Script::new(
        "002_add_email.sql",
        "ALTER TABLE users ADD email TEXT;\nCREATE INDEX idx_users_email ON users(email);",
    ));

    // === Step 2: Reconcile against an empty database ===
    println!("=== Reconciliation ===");
    let conn = Connection::open_in_memory().unwrap();
    let engine = ScriptEngine::new(conn, repo);

    let needs = engine.needs_updating().unwrap();
    println!("Needs update: {needs}");
    println!("Pending scripts:");
    for name in engine.pending() {
        println!("  {name}");
    }

    // === Step 3: Apply the pending batch ===
    println!("\n=== Application ===");
    engine.update().unwrap();
    println!("Batch applied.");

    // === Step 4: Confirm nothing is pending afterwards ===
    let up_to_date = !engine.needs_updating().unwrap();
    println!("Up to date: {up_to_date}");

    // === Step 5: Inspect the recorded history ===
    println!("\n=== History ===");
    let (conn, _) = engine.into_parts();
    for row in history::applied(&conn).unwrap() {
        println!("  {}  {}", row.applied_at, row.script_id);
    }

    println!("\nDone!");
}
