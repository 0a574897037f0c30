//! The persisted ledger of applied migration scripts.
//!
//! A single `MigrationHistory` table records one row per applied script:
//!
//! ```sql
//! MigrationHistory ( ScriptID varchar(200) primary key,
//!                    DateApplied datetime not null )
//! ```
//!
//! Rows are written exactly once, during a successful batch application,
//! and are never updated or deleted. `DateApplied` is set by the database
//! clock at insertion time.

use std::collections::HashSet;

use rusqlite::{Connection, ErrorCode, Transaction, params};

use crate::error::{MigrateError, Result};

const CREATE_HISTORY_SQL: &str = "CREATE TABLE IF NOT EXISTS MigrationHistory (
    ScriptID varchar(200) PRIMARY KEY,
    DateApplied datetime NOT NULL
);";

/// One row of the migration history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedScript {
    /// Name of the applied script.
    pub script_id: String,
    /// Database-clock timestamp recorded at application time, as stored
    /// (UTC, `YYYY-MM-DD HH:MM:SS`).
    pub applied_at: String,
}

/// Idempotently creates the history table if absent.
///
/// Runs in its own short transaction so a failure here never entangles
/// with a caller's batch. The `IF NOT EXISTS` guard makes racing creators
/// across processes safe.
///
/// # Errors
///
/// Returns [`MigrateError::HistoryTable`] after rolling back the
/// sub-transaction.
pub fn ensure_exists(conn: &mut Connection) -> Result<()> {
    let tx = conn.transaction()?;
    tx.execute_batch(CREATE_HISTORY_SQL)
        .map_err(|source| MigrateError::HistoryTable { source })?;
    tx.commit()
        .map_err(|source| MigrateError::HistoryTable { source })?;
    Ok(())
}

/// Returns whether the history table exists.
pub fn exists(conn: &Connection) -> Result<bool> {
    let mut stmt = conn.prepare(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'MigrationHistory'",
    )?;
    let count: i64 = stmt.query_row([], |row| row.get(0))?;
    Ok(count > 0)
}

/// Returns the set of all script identifiers currently recorded.
pub fn applied_ids(conn: &Connection) -> Result<HashSet<String>> {
    let mut stmt = conn.prepare("SELECT ScriptID FROM MigrationHistory")?;
    let ids = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<std::result::Result<HashSet<_>, _>>()?;
    Ok(ids)
}

/// Returns all history rows, oldest application first.
pub fn applied(conn: &Connection) -> Result<Vec<AppliedScript>> {
    let mut stmt = conn.prepare(
        "SELECT ScriptID, DateApplied FROM MigrationHistory ORDER BY DateApplied, ScriptID",
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok(AppliedScript {
                script_id: row.get(0)?,
                applied_at: row.get(1)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Records one applied script using the caller's transaction, so the
/// insert participates in the caller's atomic batch.
///
/// # Errors
///
/// Returns [`MigrateError::DuplicateHistory`] if the script is already
/// recorded.
pub fn record(tx: &Transaction<'_>, script_id: &str) -> Result<()> {
    tx.execute(
        "INSERT INTO MigrationHistory (ScriptID, DateApplied) VALUES (?1, datetime('now'))",
        params![script_id],
    )
    .map_err(|e| match e.sqlite_error_code() {
        Some(ErrorCode::ConstraintViolation) => MigrateError::DuplicateHistory {
            script: script_id.to_string(),
        },
        _ => MigrateError::Database(e),
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_exists_creates_table() {
        let mut conn = Connection::open_in_memory().unwrap();
        assert!(!exists(&conn).unwrap());
        ensure_exists(&mut conn).unwrap();
        assert!(exists(&conn).unwrap());
    }

    #[test]
    fn test_ensure_exists_is_idempotent() {
        let mut conn = Connection::open_in_memory().unwrap();
        ensure_exists(&mut conn).unwrap();
        ensure_exists(&mut conn).unwrap();
        assert!(exists(&conn).unwrap());
    }

    #[test]
    fn test_record_and_list() {
        let mut conn = Connection::open_in_memory().unwrap();
        ensure_exists(&mut conn).unwrap();

        let tx = conn.transaction().unwrap();
        record(&tx, "001_init.sql").unwrap();
        record(&tx, "002_cols.sql").unwrap();
        tx.commit().unwrap();

        let ids = applied_ids(&conn).unwrap();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains("001_init.sql"));

        let rows = applied(&conn).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(!rows[0].applied_at.is_empty());
    }

    #[test]
    fn test_record_duplicate_is_consistency_violation() {
        let mut conn = Connection::open_in_memory().unwrap();
        ensure_exists(&mut conn).unwrap();

        let tx = conn.transaction().unwrap();
        record(&tx, "001.sql").unwrap();
        let err = record(&tx, "001.sql").unwrap_err();
        assert!(matches!(
            err,
            MigrateError::DuplicateHistory { script } if script == "001.sql"
        ));
    }

    #[test]
    fn test_applied_ids_on_empty_table() {
        let mut conn = Connection::open_in_memory().unwrap();
        ensure_exists(&mut conn).unwrap();
        assert!(applied_ids(&conn).unwrap().is_empty());
    }
}
