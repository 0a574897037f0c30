//! Orchestration of reconciliation and atomic batch application.

use std::sync::{Mutex, MutexGuard, PoisonError};

use rusqlite::Connection;
use script_migrate_core::{ScriptRepository, split_with_remainder};
use tracing::{debug, info, warn};

use crate::error::{MigrateError, Result};
use crate::history;

/// Applies pending migration scripts to a SQLite database.
///
/// The engine owns one live [`Connection`] and one [`ScriptRepository`]
/// for its lifetime. Both sit behind an exclusive-access guard, so
/// [`needs_updating`](Self::needs_updating) and [`update`](Self::update)
/// on the same instance never interleave — a reconciliation read cannot
/// race an in-flight application.
///
/// The intended call sequence is reconcile-then-apply:
///
/// 1. [`needs_updating`](Self::needs_updating) prunes already-applied
///    scripts from the repository and reports whether any remain. This
///    mutation is load-bearing: afterwards the repository holds exactly
///    the work remaining.
/// 2. [`update`](Self::update) applies whatever the repository still
///    holds, in ascending name order, inside one transaction spanning the
///    entire batch.
///
/// # Examples
///
/// ```
/// use rusqlite::Connection;
/// use script_migrate_core::{Script, ScriptRepository};
/// use script_migrate_sqlite::ScriptEngine;
///
/// let conn = Connection::open_in_memory().unwrap();
/// let mut repo = ScriptRepository::new();
/// repo.add(Script::new("001_init.sql", "CREATE TABLE a (id INTEGER);"));
///
/// let engine = ScriptEngine::new(conn, repo);
/// if engine.needs_updating().unwrap() {
///     engine.update().unwrap();
/// }
/// assert!(!engine.needs_updating().unwrap());
/// ```
pub struct ScriptEngine {
    inner: Mutex<Inner>,
}

struct Inner {
    conn: Connection,
    repository: ScriptRepository,
}

impl ScriptEngine {
    /// Creates an engine over an open connection and a repository of
    /// discovered scripts.
    pub fn new(conn: Connection, repository: ScriptRepository) -> Self {
        Self {
            inner: Mutex::new(Inner { conn, repository }),
        }
    }

    /// Checks whether any migration scripts are still waiting to be
    /// applied.
    ///
    /// Ensures the history table exists, fetches all applied script ids,
    /// and prunes each correspondingly-named script from the repository.
    /// History entries with no matching script (applied long ago, since
    /// removed from the source tree) are skipped.
    ///
    /// Note that this permanently mutates the repository: after the call
    /// it represents exactly the work remaining. Calling it twice without
    /// adding scripts back yields `false` the second time.
    pub fn needs_updating(&self) -> Result<bool> {
        let mut guard = self.lock();
        let inner = &mut *guard;

        history::ensure_exists(&mut inner.conn)?;
        let applied = history::applied_ids(&inner.conn)?;

        for id in &applied {
            if inner.repository.contains(id) {
                inner.repository.remove_named(id)?;
            }
        }

        debug!(
            applied = applied.len(),
            pending = inner.repository.len(),
            "Reconciled repository against history"
        );

        Ok(!inner.repository.is_empty())
    }

    /// Applies every script remaining in the repository, in ascending
    /// name order, inside one transaction spanning the entire batch.
    ///
    /// Name order is the sole sequencing mechanism for dependent
    /// migrations, so scripts must carry a sortable, monotonic prefix
    /// (zero-padded sequence or ISO timestamp).
    ///
    /// Each script is split into statements, each statement executed, and
    /// a history record written — all within the shared transaction. After
    /// the last script the batch commits. Any failure rolls back the
    /// entire batch, undoing every script processed so far in this call,
    /// and propagates.
    ///
    /// Successful application does not prune the repository; the next
    /// [`needs_updating`](Self::needs_updating) call prunes via history.
    pub fn update(&self) -> Result<()> {
        let mut guard = self.lock();
        let inner = &mut *guard;

        let mut scripts = inner.repository.scripts();
        scripts.sort_by(|a, b| a.name.cmp(&b.name));

        let tx = inner.conn.transaction()?;
        for script in &scripts {
            let (statements, remainder) = split_with_remainder(&script.content);
            if let Some(fragment) = remainder {
                warn!(
                    script = %script.name,
                    fragment = %fragment,
                    "Text after the final ';' is never executed; scripts must terminate every clause"
                );
            }

            for (index, statement) in statements.iter().enumerate() {
                debug!(script = %script.name, index, "Executing statement");
                tx.execute_batch(statement)
                    .map_err(|source| MigrateError::Statement {
                        script: script.name.clone(),
                        index,
                        source,
                    })?;
            }

            history::record(&tx, &script.name)?;
            info!(
                script = %script.name,
                statements = statements.len(),
                "Applied migration script"
            );
        }
        tx.commit()?;

        Ok(())
    }

    /// Names of the scripts still held by the repository, in the order
    /// they would be applied.
    pub fn pending(&self) -> Vec<String> {
        let guard = self.lock();
        let mut names: Vec<String> = guard
            .repository
            .scripts()
            .into_iter()
            .map(|s| s.name)
            .collect();
        names.sort();
        names
    }

    /// Tears the engine down, returning the connection and repository.
    ///
    /// Dropping the returned connection releases the database session;
    /// consuming `self` makes the engine unusable afterwards.
    pub fn into_parts(self) -> (Connection, ScriptRepository) {
        let inner = self
            .inner
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        (inner.conn, inner.repository)
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A poisoned lock means a prior caller panicked mid-operation; its
        // transaction already rolled back on unwind, so the state is safe
        // to hand out.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use script_migrate_core::Script;

    fn engine_with(scripts: &[(&str, &str)]) -> ScriptEngine {
        let conn = Connection::open_in_memory().unwrap();
        let mut repo = ScriptRepository::new();
        for (name, content) in scripts {
            repo.add(Script::new(*name, *content));
        }
        ScriptEngine::new(conn, repo)
    }

    #[test]
    fn test_needs_updating_empty_repository() {
        let engine = engine_with(&[]);
        assert!(!engine.needs_updating().unwrap());
    }

    #[test]
    fn test_needs_updating_with_pending_scripts() {
        let engine = engine_with(&[("001.sql", "CREATE TABLE a (id int);")]);
        assert!(engine.needs_updating().unwrap());
        assert_eq!(engine.pending(), vec!["001.sql"]);
    }

    #[test]
    fn test_pending_is_sorted_by_name() {
        let engine = engine_with(&[
            ("010_later.sql", "SELECT 1;"),
            ("002_second.sql", "SELECT 1;"),
            ("001_first.sql", "SELECT 1;"),
        ]);
        assert_eq!(
            engine.pending(),
            vec!["001_first.sql", "002_second.sql", "010_later.sql"]
        );
    }

    #[test]
    fn test_needs_updating_tolerates_history_for_unknown_scripts() {
        let mut conn = Connection::open_in_memory().unwrap();
        history::ensure_exists(&mut conn).unwrap();
        let tx = conn.transaction().unwrap();
        history::record(&tx, "000_retired.sql").unwrap();
        tx.commit().unwrap();

        let mut repo = ScriptRepository::new();
        repo.add(Script::new("001.sql", "CREATE TABLE a (id int);"));
        let engine = ScriptEngine::new(conn, repo);

        assert!(engine.needs_updating().unwrap());
        assert_eq!(engine.pending(), vec!["001.sql"]);
    }

    #[test]
    fn test_statement_error_carries_context() {
        let engine = engine_with(&[(
            "001.sql",
            "CREATE TABLE a (id int);\nTHIS IS NOT SQL;",
        )]);
        assert!(engine.needs_updating().unwrap());

        let err = engine.update().unwrap_err();
        match err {
            MigrateError::Statement { script, index, .. } => {
                assert_eq!(script, "001.sql");
                assert_eq!(index, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_into_parts_returns_connection_and_repository() {
        let engine = engine_with(&[("001.sql", "CREATE TABLE a (id int);")]);
        engine.needs_updating().unwrap();
        engine.update().unwrap();

        let (conn, repo) = engine.into_parts();
        assert_eq!(repo.len(), 1);
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM MigrationHistory", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(count, 1);
    }
}
