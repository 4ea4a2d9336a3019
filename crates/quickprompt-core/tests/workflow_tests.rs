use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use quickprompt_core::request::COMPLETION_MODEL;
use quickprompt_core::{
    CompletionBackend, CompletionRequest, CompletionResponse, CompletionResult,
    CompletionWorkflow, Credential, RequestConfig, UpstreamError,
};

/// Replays queued replies in order and records every request it receives.
struct ScriptedBackend {
    replies: RefCell<VecDeque<Result<CompletionResponse, UpstreamError>>>,
    seen: RefCell<Vec<CompletionRequest>>,
    calls: Cell<usize>,
}

impl ScriptedBackend {
    fn new(replies: Vec<Result<CompletionResponse, UpstreamError>>) -> Self {
        Self {
            replies: RefCell::new(replies.into()),
            seen: RefCell::new(Vec::new()),
            calls: Cell::new(0),
        }
    }

    fn replying(text: &str) -> Self {
        Self::new(vec![Ok(CompletionResponse::single(text))])
    }

    fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl CompletionBackend for ScriptedBackend {
    fn complete(
        &self,
        _credential: &Credential,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, UpstreamError> {
        self.calls.set(self.calls.get() + 1);
        self.seen.borrow_mut().push(request.clone());
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(UpstreamError::new("no scripted reply left")))
    }
}

#[test]
fn test_malformed_credentials_never_reach_the_network() {
    let backend = ScriptedBackend::replying("should not be used");
    let workflow = CompletionWorkflow::new(&backend);

    let keys = [
        "", "   ", "sk-", "sk", "ak-123", "SK-123", "-sk-123", "sksk-1", "  sk-valid", "sk-\nabc",
    ];
    for key in keys {
        let result = workflow.execute(Credential::new(key), RequestConfig::new("hello"));
        assert_eq!(
            result,
            CompletionResult::Failure("invalid or missing credential".to_string()),
            "key {:?} should be rejected",
            key
        );
    }

    assert_eq!(backend.calls(), 0);
}

#[test]
fn test_blank_prompts_never_reach_the_network() {
    let backend = ScriptedBackend::replying("should not be used");
    let workflow = CompletionWorkflow::new(&backend);

    for prompt in ["", " ", "\n\t  \r\n"] {
        let result = workflow.execute(Credential::new("sk-valid"), RequestConfig::new(prompt));
        assert_eq!(result, CompletionResult::Failure("empty prompt".to_string()));
    }

    assert_eq!(backend.calls(), 0);
}

#[test]
fn test_success_text_is_trimmed() {
    let backend = ScriptedBackend::replying("  world  ");
    let workflow = CompletionWorkflow::new(&backend);

    let result = workflow.execute(Credential::new("sk-valid"), RequestConfig::new("hello"));

    assert_eq!(result, CompletionResult::Success("world".to_string()));
    assert_eq!(backend.calls(), 1);
}

#[test]
fn test_upstream_error_message_is_passed_through() {
    let backend = ScriptedBackend::new(vec![Err(UpstreamError::new("rate limited"))]);
    let workflow = CompletionWorkflow::new(&backend);

    let result = workflow.execute(Credential::new("sk-valid"), RequestConfig::new("hello"));

    assert_eq!(result, CompletionResult::Failure("rate limited".to_string()));
    assert_eq!(backend.calls(), 1);
}

#[test]
fn test_failed_attempt_is_not_retried() {
    let backend = ScriptedBackend::new(vec![
        Err(UpstreamError::new("connection reset")),
        Ok(CompletionResponse::single("would have worked")),
    ]);
    let workflow = CompletionWorkflow::new(&backend);

    let result = workflow.execute(Credential::new("sk-valid"), RequestConfig::new("hello"));

    assert_eq!(result, CompletionResult::Failure("connection reset".to_string()));
    assert_eq!(backend.calls(), 1);
}

#[test]
fn test_repeated_calls_are_not_cached() {
    let backend = ScriptedBackend::new(vec![
        Ok(CompletionResponse::single("first")),
        Ok(CompletionResponse::single("second")),
    ]);
    let workflow = CompletionWorkflow::new(&backend);

    let a = workflow.execute(Credential::new("sk-valid"), RequestConfig::new("hello"));
    let b = workflow.execute(Credential::new("sk-valid"), RequestConfig::new("hello"));

    assert_eq!(a, CompletionResult::Success("first".to_string()));
    assert_eq!(b, CompletionResult::Success("second".to_string()));
    assert_eq!(backend.calls(), 2);
}

#[test]
fn test_settings_forwarded_unchanged() {
    let backend = ScriptedBackend::replying("ok");
    let workflow = CompletionWorkflow::new(&backend);
    let config = RequestConfig::new("  tell me a joke\n")
        .with_max_tokens(1234)
        .with_temperature(1.3);

    workflow.execute(Credential::new("sk-valid"), config);

    let seen = backend.seen.borrow();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].model, COMPLETION_MODEL);
    assert_eq!(seen[0].prompt, "  tell me a joke\n");
    assert_eq!(seen[0].max_tokens, 1234);
    assert_eq!(seen[0].temperature, 1.3);
}

#[test]
fn test_empty_choice_list_is_a_failure() {
    let backend = ScriptedBackend::new(vec![Ok(CompletionResponse { choices: vec![] })]);
    let workflow = CompletionWorkflow::new(&backend);

    let result = workflow.execute(Credential::new("sk-valid"), RequestConfig::new("hello"));

    assert_eq!(
        result,
        CompletionResult::Failure("completion response contained no choices".to_string())
    );
}

#[test]
fn test_workflow_usable_after_failure() {
    let backend = ScriptedBackend::new(vec![
        Err(UpstreamError::new("invalid api key")),
        Ok(CompletionResponse::single("recovered")),
    ]);
    let workflow = CompletionWorkflow::new(&backend);

    let first = workflow.execute(Credential::new("sk-wrong"), RequestConfig::new("hello"));
    let second = workflow.execute(Credential::new("sk-right"), RequestConfig::new("hello"));

    assert!(!first.is_success());
    assert_eq!(second, CompletionResult::Success("recovered".to_string()));
}
