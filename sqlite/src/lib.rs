//! SQLite migration engine with history tracking and atomic batch
//! application.
//!
//! This crate runs versioned SQL migration scripts against a SQLite
//! database. It records applied scripts in a `MigrationHistory` table,
//! reconciles available scripts against that history, and applies the
//! pending ones in ascending name order as one all-or-nothing batch.
//!
//! # Architecture
//!
//! - **`history`** — the persisted ledger of applied script ids and
//!   timestamps
//! - **`engine`** — reconciliation ([`ScriptEngine::needs_updating`]) and
//!   transactional application ([`ScriptEngine::update`])
//!
//! # Quick start
//!
//! ```no_run
//! use rusqlite::Connection;
//! use script_migrate_core::{Script, ScriptRepository};
//! use script_migrate_sqlite::ScriptEngine;
//!
//! let conn = Connection::open("app.db").unwrap();
//! let mut repo = ScriptRepository::new();
//! repo.add(Script::new("001_init.sql", "CREATE TABLE users (id INTEGER);"));
//!
//! let engine = ScriptEngine::new(conn, repo);
//! if engine.needs_updating().unwrap() {
//!     engine.update().unwrap();
//! }
//! ```
//!
//! # Atomicity
//!
//! One transaction spans the entire pending batch: if any statement of
//! any script fails, every script applied so far in that call is rolled
//! back and no history rows are written. Cross-process races are caught
//! by the history table's primary key and surface as
//! [`MigrateError::DuplicateHistory`], never as a silent skip.

mod engine;
mod error;
pub mod history;

pub use engine::ScriptEngine;
pub use error::{MigrateError, Result};
pub use history::AppliedScript;
