//! # mend-model
//!
//! Platform-agnostic data model for Mend.
//!
//! These are the value types the rest of the system operates on. They carry
//! no knowledge of GitHub, issues, PRs, local directories or any other
//! platform-specific concept — platform adapters construct them from
//! external input and consume the engine's output.
//!
//! ## Key components
//!
//! - [`Goal`] — what needs to be accomplished, with priority and tags
//! - [`Repo`] — in-memory snapshot of a repository's relevant files
//! - [`AnalysisResult`] — the LLM's assessment of a goal against a repo
//! - [`ChangeSet`] — proposed complete new contents for a set of files
//! - [`FileSnapshot`] — one file's path and full content

pub mod analysis;
pub mod changeset;
pub mod goal;
pub mod repo;

pub use analysis::{AnalysisResult, ProblemType};
pub use changeset::{ChangeSet, FileSnapshot};
pub use goal::{Goal, Priority};
pub use repo::Repo;
