//! Error types for script discovery.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading migration scripts.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// Filesystem access failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The given script directory does not exist or is not a directory.
    #[error("not a script directory: {}", .0.display())]
    NotADirectory(PathBuf),
}

/// Convenience alias for results with [`DiscoveryError`].
pub type Result<T> = std::result::Result<T, DiscoveryError>;
