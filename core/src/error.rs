//! Error types for core script operations.

use thiserror::Error;

/// Errors that can occur while manipulating scripts and repositories.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No script with the given name exists in the repository.
    #[error("script not found: {0}")]
    ScriptNotFound(String),
}

/// Convenience alias for results with [`CoreError`].
pub type Result<T> = std::result::Result<T, CoreError>;
