//! Error types for migration engine operations.
//!
//! Every failure aborts the enclosing transaction and propagates; there is
//! no internal recovery or retry anywhere in the engine.

use thiserror::Error;

/// Errors that can occur while reconciling or applying migrations.
#[derive(Debug, Error)]
pub enum MigrateError {
    /// SQLite connection or query failure outside statement application.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Creating the history table failed; its sub-transaction was rolled
    /// back before this surfaced.
    #[error("failed to create history table: {source}")]
    HistoryTable {
        /// Underlying SQLite failure.
        source: rusqlite::Error,
    },

    /// A split statement failed during application. The whole batch
    /// transaction is rolled back before this surfaces.
    #[error("statement {index} of script '{script}' failed: {source}")]
    Statement {
        /// Name of the script holding the failing statement.
        script: String,
        /// Zero-based position of the statement within the script.
        index: usize,
        /// Underlying SQLite failure.
        source: rusqlite::Error,
    },

    /// A history record for this script already exists.
    ///
    /// Unreachable when reconciliation ran first; if it occurs anyway
    /// (e.g. two processes raced an identical batch), it is a consistency
    /// violation and is never swallowed.
    #[error("script '{script}' is already recorded in the migration history")]
    DuplicateHistory {
        /// Name of the already-recorded script.
        script: String,
    },

    /// Repository manipulation failure during reconciliation.
    #[error("repository error: {0}")]
    Repository(#[from] script_migrate_core::CoreError),
}

/// Convenience alias for results with [`MigrateError`].
pub type Result<T> = std::result::Result<T, MigrateError>;
