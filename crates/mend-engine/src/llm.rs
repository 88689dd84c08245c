// llm.rs — The LLM port: the capability the engine consumes.
//
// The engine owns this interface; adapters implement it and return the
// core's own AnalysisResult/ChangeSet types. Any schema conversion from a
// provider's wire format happens entirely inside the adapter.

use std::collections::BTreeMap;

use mend_model::{AnalysisResult, ChangeSet, Goal};
use thiserror::Error;

/// Errors an LLM adapter can surface to the engine.
///
/// During generation these are recoverable: the engine converts them into
/// retry context rather than aborting the goal.
#[derive(Debug, Error)]
pub enum LlmError {
    /// The backend could not be reached or returned a non-success status.
    #[error("llm transport error: {0}")]
    Transport(String),

    /// The backend responded, but the payload did not decode into the
    /// expected structure.
    #[error("llm response did not match the expected schema: {0}")]
    Schema(String),
}

/// Abstract language-model capability.
pub trait LlmPort {
    /// Analyze a goal against a textual rendering of the repository.
    fn analyze(&self, goal: &Goal, repo_context: &str) -> Result<AnalysisResult, LlmError>;

    /// Generate a candidate changeset.
    ///
    /// `file_contents` holds the current content of each file the analysis
    /// selected (empty string for files that do not exist yet).
    /// `previous_attempt` and `previous_error` carry retry context from a
    /// rejected earlier attempt, when there is one.
    fn generate(
        &self,
        goal: &Goal,
        analysis: &AnalysisResult,
        file_contents: &BTreeMap<String, String>,
        previous_attempt: Option<&str>,
        previous_error: Option<&str>,
    ) -> Result<ChangeSet, LlmError>;
}
