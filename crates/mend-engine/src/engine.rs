// engine.rs — The retry-and-validate loop.
//
// Control flow per process_goal call:
//   analyze → confidence gate → loop {
//     generate candidate → materialize in workspace → run tests →
//     accept, or record failure feedback for the next attempt
//   } bounded by the attempt budget.
//
// Attempt outcomes are an explicit tagged enum; recoverable failures are
// data flowing into the next prompt, not exceptions.

use mend_model::{AnalysisResult, ChangeSet, Goal, Repo};
use mend_runner::TestHarness;
use mend_workspace::Workspace;
use tracing::{info, warn};

use crate::context;
use crate::error::EngineError;
use crate::llm::LlmPort;

/// Analyses below this confidence are rejected before any generation
/// attempt. The gate is a strict less-than: exactly 0.3 passes.
pub const CONFIDENCE_FLOOR: f64 = 0.3;

/// Tunable engine policy.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Maximum generate→apply→test attempts per goal.
    pub max_retry_attempts: usize,

    /// Per-file character ceiling for contents fed to generation. Longer
    /// files are truncated with a marker to bound prompt size.
    pub max_file_chars: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_retry_attempts: 3,
            max_file_chars: 50_000,
        }
    }
}

/// Outcome of a single generate→apply→test attempt.
#[derive(Debug)]
pub enum AttemptOutcome {
    /// The candidate passed validation (or validation is disabled).
    Accepted(ChangeSet),

    /// The attempt failed in a way the next attempt can learn from.
    Recoverable {
        /// What went wrong, phrased for the next generation prompt.
        reason: String,
        /// Bounded summary of the rejected changeset, when one was
        /// produced. `None` leaves the previous attempt context in place.
        attempt_context: Option<String>,
    },
}

/// Drives a goal to a validated changeset or a definitive failure.
///
/// Owns the LLM port, the optional test harness, and the sandbox
/// workspace. The workspace survives across attempts and across calls for
/// the same repository, and is torn down when the engine is dropped.
///
/// Not reentrant: one engine instance processes one goal at a time, and
/// two engines never share a workspace.
pub struct Engine {
    llm: Box<dyn LlmPort>,
    harness: Option<Box<dyn TestHarness>>,
    workspace: Workspace,
    config: EngineConfig,
}

impl Engine {
    /// Create an engine with no test harness: candidates are accepted
    /// without validation. Attach a harness with [`Engine::with_harness`].
    pub fn new(llm: Box<dyn LlmPort>) -> Self {
        Self {
            llm,
            harness: None,
            workspace: Workspace::new(),
            config: EngineConfig::default(),
        }
    }

    /// Attach a test harness and return self.
    pub fn with_harness(mut self, harness: Box<dyn TestHarness>) -> Self {
        self.harness = Some(harness);
        self
    }

    /// Override the engine policy and return self.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Process a goal against a repository and return a validated
    /// changeset.
    ///
    /// # Errors
    ///
    /// [`EngineError::EmptyGoal`] for a goal without a description,
    /// [`EngineError::LowConfidence`] when analysis falls below the
    /// confidence floor, [`EngineError::Analysis`] when the analysis call
    /// itself fails, and [`EngineError::RetriesExhausted`] once the
    /// attempt budget is spent.
    pub fn process_goal(&mut self, goal: &Goal, repo: &Repo) -> Result<ChangeSet, EngineError> {
        if goal.description.trim().is_empty() {
            return Err(EngineError::EmptyGoal);
        }

        let preview: String = goal.description.chars().take(100).collect();
        info!(goal = %preview, repo = %repo.name, "processing goal");

        let repo_context = context::render_repo_context(repo);
        let analysis = self.llm.analyze(goal, &repo_context)?;
        info!(
            confidence = analysis.confidence,
            problem_type = %analysis.problem_type,
            "analysis complete"
        );

        if analysis.confidence < CONFIDENCE_FLOOR {
            return Err(EngineError::LowConfidence {
                confidence: analysis.confidence,
            });
        }

        let mut previous_attempt: Option<String> = None;
        let mut last_error: Option<String> = None;

        for attempt in 0..self.config.max_retry_attempts {
            info!(
                attempt = attempt + 1,
                max_attempts = self.config.max_retry_attempts,
                "generating solution"
            );

            match self.run_attempt(
                goal,
                repo,
                &analysis,
                previous_attempt.as_deref(),
                last_error.as_deref(),
            ) {
                AttemptOutcome::Accepted(changeset) => return Ok(changeset),
                AttemptOutcome::Recoverable {
                    reason,
                    attempt_context,
                } => {
                    warn!(attempt = attempt + 1, %reason, "attempt failed");
                    if attempt_context.is_some() {
                        previous_attempt = attempt_context;
                    }
                    last_error = Some(reason);
                }
            }
        }

        Err(EngineError::RetriesExhausted {
            attempts: self.config.max_retry_attempts,
            last_error: last_error.unwrap_or_else(|| "no attempts were made".to_string()),
        })
    }

    /// One generate→apply→test attempt. Every failure mode in here is
    /// recoverable; the caller decides when the budget is exhausted.
    fn run_attempt(
        &mut self,
        goal: &Goal,
        repo: &Repo,
        analysis: &AnalysisResult,
        previous_attempt: Option<&str>,
        last_error: Option<&str>,
    ) -> AttemptOutcome {
        let file_contents =
            context::relevant_files(repo, &analysis.files_to_modify, self.config.max_file_chars);

        let changeset = match self.llm.generate(
            goal,
            analysis,
            &file_contents,
            previous_attempt,
            last_error,
        ) {
            Ok(changeset) => changeset,
            Err(err) => {
                return AttemptOutcome::Recoverable {
                    reason: format!("generation failed: {err}"),
                    attempt_context: None,
                }
            }
        };

        if changeset.is_empty() {
            return AttemptOutcome::Recoverable {
                reason: "no changes generated".to_string(),
                attempt_context: None,
            };
        }

        let attempt_context = Some(context::render_attempt(&changeset));

        let Some(harness) = self.harness.as_deref() else {
            info!("no test harness configured, accepting solution without validation");
            return AttemptOutcome::Accepted(changeset);
        };

        // A workspace hiccup is an attempt failure, not a goal failure:
        // a transient disk issue should not force restarting the goal.
        if let Err(err) = self
            .workspace
            .ensure_ready(repo)
            .and_then(|()| self.workspace.apply(&changeset))
        {
            return AttemptOutcome::Recoverable {
                reason: format!("workspace error: {err}"),
                attempt_context,
            };
        }

        let Some(root) = self.workspace.root() else {
            return AttemptOutcome::Recoverable {
                reason: "workspace error: root missing after initialization".to_string(),
                attempt_context,
            };
        };

        let result = harness.run(root);
        if result.success {
            info!("tests passed, solution validated");
            AttemptOutcome::Accepted(changeset)
        } else {
            AttemptOutcome::Recoverable {
                reason: format!("tests failed: {}", harness.format_failure(&result)),
                attempt_context,
            }
        }
    }
}
