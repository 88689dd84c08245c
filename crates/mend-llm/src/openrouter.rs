// openrouter.rs — Blocking chat-completions client implementing LlmPort.

use std::collections::BTreeMap;
use std::time::Duration;

use mend_engine::{LlmError, LlmPort};
use mend_model::{AnalysisResult, ChangeSet, Goal};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::prompt;

/// Default OpenRouter API endpoint.
const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Per-request HTTP deadline. Generous: a whole-repository solution can
/// take a while to sample.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(180);

const MAX_TOKENS: u32 = 8192;
const TEMPERATURE: f32 = 0.2;

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

/// LLM adapter for OpenRouter's OpenAI-compatible chat completions API.
pub struct OpenRouterClient {
    http: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenRouterClient {
    /// Create a client for the given API key and model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self, LlmError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| LlmError::Transport(format!("failed to build http client: {err}")))?;

        Ok(Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            model: model.into(),
        })
    }

    /// Override the endpoint (self-hosted gateways, tests) and return self.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// One chat completion round trip: system + user message in, the
    /// first choice's content out.
    fn complete(&self, system: &str, user: &str) -> Result<String, LlmError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        debug!(model = %self.model, user_chars = user.chars().count(), "chat completion request");

        let response = self
            .http
            .post(&self.base_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .map_err(|err| LlmError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(LlmError::Transport(format!(
                "chat completion returned {status}: {body}"
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .map_err(|err| LlmError::Schema(format!("invalid completion envelope: {err}")))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| LlmError::Schema("completion contained no choices".to_string()))
    }
}

impl LlmPort for OpenRouterClient {
    fn analyze(&self, goal: &Goal, repo_context: &str) -> Result<AnalysisResult, LlmError> {
        let user = prompt::analysis_prompt(goal, repo_context);
        let raw = self.complete(prompt::ANALYSIS_SYSTEM_PROMPT, &user)?;

        serde_json::from_str(prompt::extract_json(&raw))
            .map_err(|err| LlmError::Schema(format!("analysis did not decode: {err}")))
    }

    fn generate(
        &self,
        goal: &Goal,
        analysis: &AnalysisResult,
        file_contents: &BTreeMap<String, String>,
        previous_attempt: Option<&str>,
        previous_error: Option<&str>,
    ) -> Result<ChangeSet, LlmError> {
        let user = prompt::generation_prompt(
            goal,
            analysis,
            file_contents,
            previous_attempt,
            previous_error,
        );
        let raw = self.complete(prompt::GENERATION_SYSTEM_PROMPT, &user)?;

        serde_json::from_str(prompt::extract_json(&raw))
            .map_err(|err| LlmError::Schema(format!("changeset did not decode: {err}")))
    }
}
