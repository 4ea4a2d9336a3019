//! Request and response shapes exchanged with the completion API.

use serde::{Deserialize, Serialize};

/// Completion model used for every request. Not user-configurable.
pub const COMPLETION_MODEL: &str = "gpt-3.5-turbo-instruct";

pub const DEFAULT_MAX_TOKENS: u32 = 500;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const MIN_TEMPERATURE: f32 = 0.0;
pub const MAX_TEMPERATURE: f32 = 2.0;

/// Sample question both front-ends start with
pub const DEFAULT_PROMPT: &str =
    "What are the three key pieces of advice for learning how to code?";

/// Per-submission settings, built fresh from the current UI state.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestConfig {
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl RequestConfig {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Body of `POST /completions`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl CompletionRequest {
    pub fn from_config(config: &RequestConfig) -> Self {
        Self {
            model: COMPLETION_MODEL.to_string(),
            prompt: config.prompt.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CompletionChoice {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CompletionResponse {
    pub choices: Vec<CompletionChoice>,
}

impl CompletionResponse {
    /// Response carrying a single choice, mostly handy for stubs
    pub fn single(text: impl Into<String>) -> Self {
        Self {
            choices: vec![CompletionChoice { text: text.into() }],
        }
    }

    pub fn first_text(&self) -> Option<&str> {
        self.choices.first().map(|c| c.text.as_str())
    }
}
