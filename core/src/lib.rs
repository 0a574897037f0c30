//! Core types and statement splitting for SQL migration scripts.
//!
//! This crate defines the domain model shared by the migration engine and
//! its collaborators:
//!
//! - [`Script`] — a named, immutable unit of SQL changes to be applied
//!   once.
//! - [`ScriptRepository`] — the in-memory set of discovered scripts,
//!   pruned during reconciliation until it holds exactly the work
//!   remaining.
//! - [`split_statements`] — decomposition of raw script text into an
//!   ordered sequence of executable SQL statements, aware of quoting and
//!   comment context.
//!
//! No I/O happens here; loading script text belongs to the discovery
//! crate, and execution belongs to the sqlite crate.
//!
//! # Example
//!
//! ```
//! use script_migrate_core::{Script, ScriptRepository, split_statements};
//!
//! let mut repo = ScriptRepository::new();
//! repo.add(Script::new(
//!     "001_init.sql",
//!     "CREATE TABLE users (id INTEGER);\nCREATE INDEX idx_users ON users(id);",
//! ));
//!
//! let scripts = repo.scripts();
//! assert_eq!(split_statements(&scripts[0].content).len(), 2);
//! ```

mod error;
mod repository;
mod script;
mod splitter;

pub use error::{CoreError, Result};
pub use repository::ScriptRepository;
pub use script::Script;
pub use splitter::{split_statements, split_with_remainder};
