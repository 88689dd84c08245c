//! # mend-engine
//!
//! The retry-and-validate engine at the center of Mend.
//!
//! Drives a [`mend_model::Goal`] to either a validated
//! [`mend_model::ChangeSet`] or a definitive, explained failure:
//! analyze the goal, gate on confidence, then loop — generate a candidate
//! through the [`LlmPort`], materialize it in the sandbox workspace, run
//! the test harness, and on failure feed the formatted output back into
//! the next generation attempt.
//!
//! ## Key components
//!
//! - [`Engine`] — owns the LLM port, the test harness and the workspace;
//!   `process_goal` is the single entry point
//! - [`LlmPort`] — the capability the engine consumes for analysis and
//!   generation; adapters return the core's own types
//! - [`EngineError`] — the non-recoverable error taxonomy
//! - [`EngineConfig`] — attempt budget and prompt-size ceiling

pub mod context;
pub mod engine;
pub mod error;
pub mod llm;

pub use engine::{AttemptOutcome, Engine, EngineConfig, CONFIDENCE_FLOOR};
pub use error::EngineError;
pub use llm::{LlmError, LlmPort};
