//! # mend-runner
//!
//! Test command execution for Mend.
//!
//! Runs a configured test command in a working directory (normally the
//! sandbox workspace), captures stdout/stderr/exit code, and formats
//! failures into model-readable feedback text.
//!
//! Infrastructure failures — a command that cannot be spawned, or one
//! that exceeds the timeout — are normal, recoverable results with the
//! sentinel return code `-1`, never panics or `Err`s: the retry loop
//! treats them like any other failed validation.
//!
//! ## Key components
//!
//! - [`TestHarness`] — trait the engine validates candidates through
//! - [`CommandTestRunner`] — subprocess-based implementation with a hard
//!   timeout
//! - [`TestResult`] — captured outcome of one test run

pub mod runner;

pub use runner::{CommandTestRunner, TestHarness, TestResult, DEFAULT_TIMEOUT};
