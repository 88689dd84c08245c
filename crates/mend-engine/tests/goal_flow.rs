//! End-to-end engine flow against a real sandbox workspace and a real
//! test command (grep standing in for a test suite).

use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};

use mend_engine::{Engine, EngineConfig, EngineError, LlmError, LlmPort};
use mend_model::{AnalysisResult, ChangeSet, FileSnapshot, Goal, ProblemType, Repo};
use mend_runner::CommandTestRunner;

/// Plays back a fixed sequence of generated changesets.
struct PlaybackLlm {
    confidence: f64,
    generations: RefCell<VecDeque<ChangeSet>>,
}

impl PlaybackLlm {
    fn new(confidence: f64, generations: Vec<ChangeSet>) -> Self {
        Self {
            confidence,
            generations: RefCell::new(generations.into()),
        }
    }
}

impl LlmPort for PlaybackLlm {
    fn analyze(&self, _goal: &Goal, _repo_context: &str) -> Result<AnalysisResult, LlmError> {
        Ok(AnalysisResult {
            summary: "login is broken".into(),
            problem_type: ProblemType::Bug,
            suggested_approach: "make login return a value".into(),
            files_to_modify: vec!["auth.py".into()],
            confidence: self.confidence,
        })
    }

    fn generate(
        &self,
        _goal: &Goal,
        _analysis: &AnalysisResult,
        _file_contents: &BTreeMap<String, String>,
        _previous_attempt: Option<&str>,
        _previous_error: Option<&str>,
    ) -> Result<ChangeSet, LlmError> {
        self.generations
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| LlmError::Transport("playback exhausted".into()))
    }
}

fn fix(body: &str) -> ChangeSet {
    ChangeSet {
        summary: "Fix login".into(),
        description: "Make login return a real value".into(),
        files: vec![FileSnapshot::new("auth.py", body)],
        branch_name: "mend/fix-login".into(),
        test_command: None,
    }
}

fn repo() -> Repo {
    Repo::new("auth-service")
        .with_file("auth.py", "def login(): pass")
        .with_file("README.md", "# auth-service")
}

/// "Test suite": passes only when the fix actually landed on disk.
fn grep_harness() -> CommandTestRunner {
    CommandTestRunner::new(vec![
        "sh".into(),
        "-c".into(),
        "grep -q 'return True' auth.py".into(),
    ])
}

#[test]
fn validated_changeset_on_first_attempt() {
    let llm = PlaybackLlm::new(0.9, vec![fix("def login(): return True")]);
    let mut engine = Engine::new(Box::new(llm)).with_harness(Box::new(grep_harness()));

    let changeset = engine
        .process_goal(&Goal::new("Fix login bug"), &repo())
        .unwrap();

    assert_eq!(changeset.files[0].content, "def login(): return True");
}

#[test]
fn failing_candidate_is_retried_until_tests_pass() {
    let llm = PlaybackLlm::new(
        0.9,
        vec![
            fix("def login(): return None"),
            fix("def login(): return True"),
        ],
    );
    let mut engine = Engine::new(Box::new(llm)).with_harness(Box::new(grep_harness()));

    let changeset = engine
        .process_goal(&Goal::new("Fix login bug"), &repo())
        .unwrap();

    assert_eq!(changeset.files[0].content, "def login(): return True");
}

#[test]
fn stubborn_failures_exhaust_the_budget() {
    let llm = PlaybackLlm::new(
        0.9,
        vec![
            fix("def login(): return None"),
            fix("def login(): return False"),
        ],
    );
    let mut engine = Engine::new(Box::new(llm))
        .with_harness(Box::new(grep_harness()))
        .with_config(EngineConfig {
            max_retry_attempts: 2,
            ..EngineConfig::default()
        });

    let result = engine.process_goal(&Goal::new("Fix login bug"), &repo());
    match result {
        Err(EngineError::RetriesExhausted { attempts, .. }) => assert_eq!(attempts, 2),
        other => panic!("expected RetriesExhausted, got {other:?}"),
    }
}
