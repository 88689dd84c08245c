// error.rs — Error types for the local adapter.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur loading from or writing to a local directory.
#[derive(Debug, Error)]
pub enum LocalError {
    /// A file I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The goal file was empty.
    #[error("goal file is empty: {path}")]
    EmptyGoal { path: PathBuf },

    /// The repository path is not a directory.
    #[error("not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// A changeset path tried to escape the target directory.
    #[error("path escapes target directory: {path}")]
    PathTraversal { path: String },
}
