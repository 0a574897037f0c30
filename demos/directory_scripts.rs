//! Directory-based script discovery example.
//!
//! Writes a few `.sql` files to a temporary directory, loads them with
//! the discovery crate, and applies them to a file-backed database twice
//! to show the second run is a no-op.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p script-migrate-demos --example directory_scripts
//! ```

use rusqlite::Connection;
use script_migrate_discovery::ScriptSet;
use script_migrate_sqlite::ScriptEngine;

fn main() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("demo.db");

    std::fs::write(
        dir.path().join("001_init.sql"),
        "CREATE TABLE notes (id INTEGER PRIMARY KEY, body TEXT);",
    )
    .unwrap();
    std::fs::write(
        dir.path().join("002_seed.sql"),
        "INSERT INTO notes (body) VALUES ('hello');\nINSERT INTO notes (body) VALUES ('world');",
    )
    .unwrap();

    // === First run: both scripts are pending ===
    let set = ScriptSet::from_dir(dir.path()).unwrap();
    println!("Discovered {} script(s):", set.len());
    for name in set.names() {
        println!("  {name}");
    }

    let engine = ScriptEngine::new(Connection::open(&db_path).unwrap(), set.into_repository());
    println!("Needs update: {}", engine.needs_updating().unwrap());
    engine.update().unwrap();
    println!("Applied.");
    drop(engine.into_parts());

    // === Second run: history says everything is applied ===
    let set = ScriptSet::from_dir(dir.path()).unwrap();
    let engine = ScriptEngine::new(Connection::open(&db_path).unwrap(), set.into_repository());
    println!(
        "Needs update on second run: {}",
        engine.needs_updating().unwrap()
    );

    println!("\nDone!");
}
