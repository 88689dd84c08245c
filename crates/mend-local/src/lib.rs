//! # mend-local
//!
//! Local filesystem platform adapter for Mend.
//!
//! Bridges real directories and the engine's platform-agnostic model:
//! loads a [`mend_model::Goal`] from a text file, snapshots a directory
//! into a [`mend_model::Repo`] (text files only; hidden entries and
//! common build directories are skipped), and writes an accepted
//! [`mend_model::ChangeSet`] back to disk.

pub mod adapter;
pub mod error;

pub use adapter::{apply_changeset, load_goal, load_repo};
pub use error::LocalError;
