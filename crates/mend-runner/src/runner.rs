// runner.rs — Subprocess test execution with a hard deadline.
//
// std::process::Command has no wait-with-timeout, and reading both pipes
// after the child exits can deadlock once a pipe buffer fills. So: drain
// stdout/stderr on two reader threads while the main thread waits with
// wait_timeout, killing the child when the deadline passes.

use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;

use tracing::{debug, warn};
use wait_timeout::ChildExt;

/// Default hard deadline for one test run.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Captured outcome of one test run.
#[derive(Debug, Clone)]
pub struct TestResult {
    /// Whether the command exited successfully within the deadline.
    pub success: bool,

    /// Captured stdout.
    pub output: String,

    /// Captured stderr.
    pub error_output: String,

    /// Process exit code. `-1` is the sentinel for infrastructure
    /// failures: timeout, spawn failure, or setup error.
    pub return_code: i32,
}

impl TestResult {
    /// A failed result for problems running the tests at all (as opposed
    /// to the tests themselves failing).
    pub fn infra_failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            output: String::new(),
            error_output: message.into(),
            return_code: -1,
        }
    }
}

/// Validates candidate changes by running tests in a working directory.
///
/// The engine only needs `run` and `format_failure`; test doubles swap in
/// scripted outcomes through this seam.
pub trait TestHarness {
    /// Run the test suite in `cwd`. Never fails — infrastructure problems
    /// come back as a `TestResult` with return code `-1`.
    fn run(&self, cwd: &Path) -> TestResult;

    /// Format a failed result into feedback text for the model.
    fn format_failure(&self, result: &TestResult) -> String {
        format_failure(result)
    }
}

/// Deterministic failure block: return code, stdout, stderr, and the fix
/// instruction the model is expected to act on.
pub fn format_failure(result: &TestResult) -> String {
    format!(
        "TESTS FAILED (return code: {})\n\n\
         STDOUT:\n{}\n\n\
         STDERR:\n{}\n\n\
         Please analyze the test failures and fix the code. \
         The tests must pass before the changes can be accepted.",
        result.return_code, result.output, result.error_output
    )
}

/// Runs an external test command with a hard timeout.
#[derive(Debug, Clone)]
pub struct CommandTestRunner {
    command: Vec<String>,
    timeout: Duration,
}

impl Default for CommandTestRunner {
    fn default() -> Self {
        Self::new(vec!["cargo".into(), "test".into()])
    }
}

impl CommandTestRunner {
    /// Create a runner for the given command list (program + args).
    pub fn new(command: Vec<String>) -> Self {
        Self {
            command,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the hard deadline and return self.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The configured command list.
    pub fn command(&self) -> &[String] {
        &self.command
    }
}

impl TestHarness for CommandTestRunner {
    fn run(&self, cwd: &Path) -> TestResult {
        let Some((program, args)) = self.command.split_first() else {
            return TestResult::infra_failure("no test command configured");
        };

        debug!(command = ?self.command, cwd = %cwd.display(), "running tests");

        let mut child = match Command::new(program)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
        {
            Ok(child) => child,
            Err(err) => {
                warn!(%err, "failed to spawn test command");
                return TestResult::infra_failure(format!("failed to run tests: {err}"));
            }
        };

        // Pipes must be drained while the child runs or a full pipe
        // buffer blocks the child forever.
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let stdout_handle = thread::spawn(move || drain(stdout));
        let stderr_handle = thread::spawn(move || drain(stderr));

        let status = match child.wait_timeout(self.timeout) {
            Ok(Some(status)) => Some(status),
            Ok(None) => {
                warn!(timeout_secs = self.timeout.as_secs(), "test command timed out, killing");
                let _ = child.kill();
                let _ = child.wait();
                None
            }
            Err(err) => {
                let _ = child.kill();
                let _ = child.wait();
                warn!(%err, "failed waiting for test command");
                return TestResult::infra_failure(format!("failed to run tests: {err}"));
            }
        };

        let output = stdout_handle.join().unwrap_or_default();
        let error_output = stderr_handle.join().unwrap_or_default();

        match status {
            Some(status) => {
                let return_code = status.code().unwrap_or(-1);
                debug!(return_code, "test command finished");
                TestResult {
                    success: status.success(),
                    output,
                    error_output,
                    return_code,
                }
            }
            None => TestResult::infra_failure(format!(
                "tests timed out after {} seconds",
                self.timeout.as_secs()
            )),
        }
    }
}

fn drain<R: Read>(reader: Option<R>) -> String {
    let Some(mut reader) = reader else {
        return String::new();
    };
    let mut buf = Vec::new();
    let _ = reader.read_to_end(&mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}
