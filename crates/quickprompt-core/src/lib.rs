pub mod ai;
pub mod backend;
pub mod config;
pub mod credential;
pub mod error;
pub mod request;
pub mod state;
pub mod workflow;

// Re-export main types for convenience
pub use ai::OpenAIClient;
pub use backend::CompletionBackend;
pub use config::Settings;
pub use credential::{resolve_credential, Credential};
pub use error::{CompletionError, UpstreamError, ValidationError};
pub use request::{CompletionRequest, CompletionResponse, RequestConfig};
pub use state::RequestPhase;
pub use workflow::{validate, CompletionResult, CompletionWorkflow};
