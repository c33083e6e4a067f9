//! Path-related error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during path resolution and directory operations.
#[derive(Debug, Error)]
pub enum PathError {
    #[error("Cannot determine home directory")]
    NoHomeDir,

    /// Could not determine the local application data directory.
    #[error("Cannot determine local data directory")]
    NoDataDir,

    #[error("Cannot determine config directory")]
    NoConfigDir,

    /// A path was expected to be a directory but was not.
    #[error("{0} exists but is not a directory")]
    NotADirectory(PathBuf),

    #[error("Failed to create directory {path}: {reason}")]
    CreateFailed { path: PathBuf, reason: String },

    #[error("Path cannot be empty")]
    EmptyPath,

    #[error("Cannot determine current directory: {0}")]
    CurrentDirError(String),
}
