//! # mend-cli
//!
//! Command-line interface for Mend.
//!
//! - `mend run` — load a goal and a repository from disk, drive the
//!   retry-and-validate engine, and print (or apply) the winning changeset

mod config;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mend_engine::{Engine, EngineConfig};
use mend_llm::OpenRouterClient;
use mend_runner::CommandTestRunner;
use tracing_subscriber::EnvFilter;

use config::Config;

/// Mend CLI — resolve goals against a repository.
#[derive(Parser)]
#[command(name = "mend", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a goal against a local repository.
    Run {
        /// Path to a text file containing the goal description.
        #[arg(long)]
        goal: PathBuf,

        /// Repository directory to analyze (defaults to current directory).
        #[arg(long, default_value = ".")]
        repo: PathBuf,

        /// Write the accepted changeset back into the repository.
        #[arg(long)]
        apply: bool,

        /// Test command validating each candidate (defaults to `cargo test`).
        #[arg(long)]
        test_command: Option<String>,

        /// Accept candidates without running tests.
        #[arg(long)]
        no_test: bool,

        /// Attempt budget (overrides MEND_MAX_RETRY_ATTEMPTS).
        #[arg(long)]
        max_attempts: Option<usize>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("mend_engine=info".parse()?)
                .add_directive("mend_workspace=info".parse()?)
                .add_directive("mend_cli=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            goal,
            repo,
            apply,
            test_command,
            no_test,
            max_attempts,
        } => run(&goal, &repo, apply, test_command.as_deref(), no_test, max_attempts),
    }
}

fn run(
    goal_path: &Path,
    repo_path: &Path,
    apply: bool,
    test_command: Option<&str>,
    no_test: bool,
    max_attempts: Option<usize>,
) -> Result<()> {
    let settings = Config::from_env()?;

    let goal = mend_local::load_goal(goal_path)
        .with_context(|| format!("failed to load goal from {}", goal_path.display()))?;
    let repo = mend_local::load_repo(repo_path)
        .with_context(|| format!("failed to load repository from {}", repo_path.display()))?;

    let llm = OpenRouterClient::new(settings.api_key, settings.model)
        .context("failed to build LLM client")?;

    let mut engine = Engine::new(Box::new(llm));
    if !no_test {
        let harness = match test_command {
            Some(command) => {
                let argv = config::split_command(command);
                anyhow::ensure!(!argv.is_empty(), "test command is empty");
                CommandTestRunner::new(argv)
            }
            None => CommandTestRunner::default(),
        };
        engine = engine.with_harness(Box::new(harness));
    }

    let attempts = max_attempts.or(settings.max_retry_attempts);
    if let Some(max_retry_attempts) = attempts {
        engine = engine.with_config(EngineConfig {
            max_retry_attempts,
            ..EngineConfig::default()
        });
    }

    let changeset = engine.process_goal(&goal, &repo)?;

    println!("{}", changeset.summary);
    if !changeset.description.is_empty() {
        println!("\n{}", changeset.description);
    }
    println!("\nFiles ({}):", changeset.files.len());
    for path in changeset.paths() {
        println!("  {path}");
    }
    if !changeset.branch_name.is_empty() {
        println!("\nSuggested branch: {}", changeset.branch_name);
    }
    if let Some(command) = &changeset.test_command {
        println!("Suggested test command: {command}");
    }

    if apply {
        mend_local::apply_changeset(repo_path, &changeset)
            .with_context(|| format!("failed to apply changeset to {}", repo_path.display()))?;
        println!("\nApplied to {}", repo_path.display());
    }

    Ok(())
}
