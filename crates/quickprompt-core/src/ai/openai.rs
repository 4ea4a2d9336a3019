use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::backend::CompletionBackend;
use crate::config::Settings;
use crate::credential::Credential;
use crate::error::UpstreamError;
use crate::request::{CompletionRequest, CompletionResponse};

#[derive(Deserialize)]
struct OpenAIErrorBody {
    error: OpenAIErrorDetail,
}

#[derive(Deserialize)]
struct OpenAIErrorDetail {
    message: String,
}

/// Blocking client for the legacy `/completions` endpoint.
///
/// Must be built and used off any async executor thread, e.g. inside
/// `tokio::task::spawn_blocking`.
#[derive(Clone)]
pub struct OpenAIClient {
    client: Client,
    base_url: String,
}

impl OpenAIClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, UpstreamError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, UpstreamError> {
        Self::new(settings.base_url(), settings.timeout())
    }

    pub fn endpoint(&self) -> String {
        format!("{}/completions", self.base_url)
    }
}

impl CompletionBackend for OpenAIClient {
    fn complete(
        &self,
        credential: &Credential,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, UpstreamError> {
        let url = self.endpoint();
        debug!(url = %url, model = %request.model, "sending completion request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(credential.expose())
            .json(request)
            .send()?;

        let status = response.status();
        let body = response.text()?;
        interpret_response(status, &body)
    }
}

/// Turn a raw HTTP status and body into the parsed response or an error whose
/// message is fit to show the user.
pub(crate) fn interpret_response(
    status: StatusCode,
    body: &str,
) -> Result<CompletionResponse, UpstreamError> {
    if !status.is_success() {
        let message = match serde_json::from_str::<OpenAIErrorBody>(body) {
            Ok(parsed) => format!("OpenAI API error ({}): {}", status, parsed.error.message),
            Err(_) => format!("OpenAI API error {}: {}", status, body.trim()),
        };
        return Err(UpstreamError::new(message));
    }

    serde_json::from_str(body)
        .map_err(|e| UpstreamError::new(format!("Failed to parse completion response: {}", e)))
}
