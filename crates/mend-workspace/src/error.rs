// error.rs — Error types for the workspace subsystem.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during workspace operations.
#[derive(Debug, Error)]
pub enum WorkspaceError {
    /// A file I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A path traversal attempt was detected (security violation).
    #[error("path traversal detected: '{path}' resolves outside the workspace root")]
    PathTraversal { path: String },

    /// An operation requiring an initialized workspace was called before
    /// `initialize` (or after `teardown`).
    #[error("workspace not initialized")]
    NotInitialized,
}
