// analysis.rs — The LLM's assessment of a goal against a repository.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Classification of the problem a goal describes.
///
/// `#[serde(other)]` makes unknown strings from the model decode to
/// `Other` instead of failing the whole analysis.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProblemType {
    Bug,
    Feature,
    Documentation,
    Enhancement,
    #[serde(other)]
    Other,
}

impl fmt::Display for ProblemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProblemType::Bug => write!(f, "bug"),
            ProblemType::Feature => write!(f, "feature"),
            ProblemType::Documentation => write!(f, "documentation"),
            ProblemType::Enhancement => write!(f, "enhancement"),
            ProblemType::Other => write!(f, "other"),
        }
    }
}

/// Result of analyzing a goal against a repository.
///
/// Produced once per `process_goal` call by the LLM port and never
/// mutated afterward. `confidence` is in `[0.0, 1.0]`; the engine
/// refuses to attempt generation below its confidence floor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Brief summary of the goal.
    pub summary: String,

    /// What kind of problem this is.
    pub problem_type: ProblemType,

    /// Detailed approach guiding solution generation.
    pub suggested_approach: String,

    /// Files that likely need modification, in the order the model
    /// considers them relevant. Paths absent from the repository snapshot
    /// signal files to be created.
    pub files_to_modify: Vec<String>,

    /// Confidence level between 0.0 and 1.0.
    pub confidence: f64,
}
