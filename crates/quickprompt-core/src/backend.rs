use crate::credential::Credential;
use crate::error::UpstreamError;
use crate::request::{CompletionRequest, CompletionResponse};

/// The network dependency of the workflow: one blocking call per invocation.
///
/// Implemented by [`crate::ai::OpenAIClient`] for real traffic and by test
/// doubles that count or capture calls.
pub trait CompletionBackend {
    fn complete(
        &self,
        credential: &Credential,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, UpstreamError>;
}

impl<B: CompletionBackend + ?Sized> CompletionBackend for &B {
    fn complete(
        &self,
        credential: &Credential,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, UpstreamError> {
        (**self).complete(credential, request)
    }
}

impl<B: CompletionBackend + ?Sized> CompletionBackend for Box<B> {
    fn complete(
        &self,
        credential: &Credential,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, UpstreamError> {
        (**self).complete(credential, request)
    }
}
