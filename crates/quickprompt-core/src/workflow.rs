//! The prompt completion request workflow.
//!
//! Validates the credential and request settings locally, issues exactly one
//! request through a [`CompletionBackend`], and maps the outcome to a
//! [`CompletionResult`] a UI can render directly. Holds no state between
//! invocations: nothing is cached, retried, or deduplicated.

use tracing::{info, warn};

use crate::backend::CompletionBackend;
use crate::credential::Credential;
use crate::error::{CompletionError, UpstreamError, ValidationError};
use crate::request::{CompletionRequest, RequestConfig, MAX_TEMPERATURE, MIN_TEMPERATURE};

/// Outcome of one request/response cycle, ready for display.
#[derive(Debug, Clone, PartialEq)]
pub enum CompletionResult {
    Success(String),
    Failure(String),
}

impl CompletionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, CompletionResult::Success(_))
    }

    pub fn text(&self) -> &str {
        match self {
            CompletionResult::Success(text) | CompletionResult::Failure(text) => text,
        }
    }
}

impl From<Result<String, CompletionError>> for CompletionResult {
    fn from(result: Result<String, CompletionError>) -> Self {
        match result {
            Ok(text) => CompletionResult::Success(text),
            Err(e) => CompletionResult::Failure(e.to_string()),
        }
    }
}

/// Local checks, in order, stopping at the first failure.
pub fn validate(credential: &Credential, config: &RequestConfig) -> Result<(), ValidationError> {
    if !credential.is_well_formed() {
        return Err(ValidationError::InvalidCredential);
    }

    if config.prompt.trim().is_empty() {
        return Err(ValidationError::EmptyPrompt);
    }

    if config.max_tokens == 0 {
        return Err(ValidationError::InvalidSettings(
            "max_tokens must be positive".to_string(),
        ));
    }

    if !config.temperature.is_finite()
        || !(MIN_TEMPERATURE..=MAX_TEMPERATURE).contains(&config.temperature)
    {
        return Err(ValidationError::InvalidSettings(format!(
            "temperature {} is outside {:.1}..={:.1}",
            config.temperature, MIN_TEMPERATURE, MAX_TEMPERATURE
        )));
    }

    Ok(())
}

pub struct CompletionWorkflow<B> {
    backend: B,
}

impl<B: CompletionBackend> CompletionWorkflow<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn execute(&self, credential: Credential, config: RequestConfig) -> CompletionResult {
        self.try_execute(credential, config).into()
    }

    /// Same as [`execute`](Self::execute) but keeps the error kind.
    pub fn try_execute(
        &self,
        credential: Credential,
        config: RequestConfig,
    ) -> Result<String, CompletionError> {
        if let Err(e) = validate(&credential, &config) {
            warn!(error = %e, "rejected completion request before sending");
            return Err(e.into());
        }

        let request = CompletionRequest::from_config(&config);
        info!(
            model = %request.model,
            max_tokens = request.max_tokens,
            temperature = request.temperature,
            credential = %credential.masked(),
            "requesting completion"
        );

        let response = self.backend.complete(&credential, &request).map_err(|e| {
            warn!(error = %e, "completion request failed");
            e
        })?;

        let text = response
            .first_text()
            .ok_or_else(|| UpstreamError::new("completion response contained no choices"))?
            .trim()
            .to_string();

        info!(chars = text.chars().count(), "completion received");
        Ok(text)
    }
}
