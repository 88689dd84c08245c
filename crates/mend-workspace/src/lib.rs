//! # mend-workspace
//!
//! Isolated sandbox workspace manager for Mend.
//!
//! Owns exactly one on-disk temporary directory that mirrors, file for
//! file, the current state of a logical [`mend_model::Repo`] — optionally
//! overlaid with a candidate [`mend_model::ChangeSet`] for test execution.
//! The workspace persists across retry attempts and across repeated engine
//! calls for the same repository, so only changed files are rewritten.
//!
//! ## Key components
//!
//! - [`Workspace`] — the sandbox: initialize, synchronize, apply, teardown
//! - [`WorkspaceError`] — I/O, traversal and lifecycle errors

pub mod error;
pub mod sandbox;

pub use error::WorkspaceError;
pub use sandbox::Workspace;
