//! # mend-llm
//!
//! OpenRouter-backed implementation of the engine's [`mend_engine::LlmPort`].
//!
//! Talks to the OpenAI-compatible chat completions API with a blocking
//! HTTP client (the engine is synchronous by design). Prompts ask for
//! strict JSON; responses are decoded directly into the core's
//! `AnalysisResult` and `ChangeSet` types, tolerating the markdown
//! code fences some models insist on wrapping JSON in.

pub mod openrouter;
mod prompt;

pub use openrouter::OpenRouterClient;
