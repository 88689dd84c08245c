// config.rs — Environment-driven runtime configuration.

use anyhow::{Context, Result};

/// Model used when MEND_MODEL is not set.
const DEFAULT_MODEL: &str = "anthropic/claude-3.5-sonnet";

/// Settings sourced from the environment. CLI flags override these.
pub struct Config {
    /// API key for the OpenRouter gateway. Required.
    pub api_key: String,

    /// Model identifier passed through to the gateway.
    pub model: String,

    /// Attempt budget override, when MEND_MAX_RETRY_ATTEMPTS is set.
    pub max_retry_attempts: Option<usize>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENROUTER_API_KEY")
            .context("OPENROUTER_API_KEY is not set; an API key is required to call the LLM")?;

        let model = std::env::var("MEND_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let max_retry_attempts = match std::env::var("MEND_MAX_RETRY_ATTEMPTS") {
            Ok(raw) => Some(
                raw.parse()
                    .with_context(|| format!("MEND_MAX_RETRY_ATTEMPTS is not a number: {raw}"))?,
            ),
            Err(_) => None,
        };

        Ok(Self {
            api_key,
            model,
            max_retry_attempts,
        })
    }
}

/// Split a shell-ish test command into argv on whitespace. Quoting is not
/// interpreted; commands needing quotes should be wrapped in `sh -c`.
pub fn split_command(command: &str) -> Vec<String> {
    command.split_whitespace().map(str::to_string).collect()
}
