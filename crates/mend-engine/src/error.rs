// error.rs — Non-recoverable engine errors.
//
// Recoverable failures (generation produced nothing usable, tests failed,
// workspace I/O hiccups) never appear here: they are converted into retry
// context at the attempt boundary. Only configuration problems, the
// confidence gate, analysis-stage failures and retry exhaustion escape
// `process_goal`.

use thiserror::Error;

use crate::llm::LlmError;

/// Errors that terminate goal processing.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The goal carried no description to act on.
    #[error("goal description is empty")]
    EmptyGoal,

    /// Analysis confidence fell below the engine's confidence floor; no
    /// generation attempt was made.
    #[error("analysis confidence too low: {confidence}")]
    LowConfidence { confidence: f64 },

    /// The analysis call itself failed. This happens before any attempt
    /// exists, so there is no retry context to feed it into.
    #[error("goal analysis failed: {0}")]
    Analysis(#[from] LlmError),

    /// Every attempt in the budget failed.
    #[error("failed to generate a valid solution after {attempts} attempts; last error: {last_error}")]
    RetriesExhausted { attempts: usize, last_error: String },
}
