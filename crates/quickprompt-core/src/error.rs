use thiserror::Error;

/// Input problems caught before any network activity.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("invalid or missing credential")]
    InvalidCredential,

    #[error("empty prompt")]
    EmptyPrompt,

    #[error("invalid request settings: {0}")]
    InvalidSettings(String),
}

/// Anything the completion API call reported: auth rejection, rate limiting,
/// transport failure, or a body that could not be understood.
///
/// The message is shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct UpstreamError {
    pub message: String,
}

impl UpstreamError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for UpstreamError {
    fn from(error: reqwest::Error) -> Self {
        UpstreamError::new(error.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompletionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages() {
        assert_eq!(
            ValidationError::InvalidCredential.to_string(),
            "invalid or missing credential"
        );
        assert_eq!(ValidationError::EmptyPrompt.to_string(), "empty prompt");
    }

    #[test]
    fn test_upstream_message_is_verbatim() {
        let err = CompletionError::from(UpstreamError::new("rate limited"));
        assert_eq!(err.to_string(), "rate limited");
    }
}
