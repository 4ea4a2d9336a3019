//! UI-agnostic request state
//!
//! Shells (terminal app, one-shot command, anything else) drive this to decide
//! when to show a spinner or refuse another submission. The workflow itself
//! stays stateless.

/// Where a single submission currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestPhase {
    #[default]
    Idle,
    Validating,
    Requesting,
}

impl RequestPhase {
    pub fn is_busy(&self) -> bool {
        *self != RequestPhase::Idle
    }

    /// Start a submission. Returns false (and stays put) if one is already running.
    pub fn begin_validation(&mut self) -> bool {
        if self.is_busy() {
            return false;
        }
        *self = RequestPhase::Validating;
        true
    }

    /// Validation passed; the network call is about to go out.
    pub fn begin_request(&mut self) -> bool {
        if *self != RequestPhase::Validating {
            return false;
        }
        *self = RequestPhase::Requesting;
        true
    }

    /// Every path ends here, success or failure.
    pub fn finish(&mut self) {
        *self = RequestPhase::Idle;
    }

    pub fn status_text(&self) -> &'static str {
        match self {
            RequestPhase::Idle => "Ready",
            // Validation is synchronous, so it never shows on its own
            RequestPhase::Validating | RequestPhase::Requesting => "Generating response...",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_path_returns_to_idle() {
        let mut phase = RequestPhase::default();
        assert!(phase.begin_validation());
        assert!(phase.begin_request());
        assert_eq!(phase, RequestPhase::Requesting);
        phase.finish();
        assert_eq!(phase, RequestPhase::Idle);
    }

    #[test]
    fn test_validation_failure_returns_to_idle() {
        let mut phase = RequestPhase::default();
        assert!(phase.begin_validation());
        phase.finish();
        assert_eq!(phase, RequestPhase::Idle);
        assert!(!phase.is_busy());
    }

    #[test]
    fn test_no_second_submission_while_busy() {
        let mut phase = RequestPhase::default();
        assert!(phase.begin_validation());
        assert!(phase.begin_request());
        assert!(!phase.begin_validation());
        assert_eq!(phase, RequestPhase::Requesting);
    }

    #[test]
    fn test_request_requires_validation_first() {
        let mut phase = RequestPhase::Idle;
        assert!(!phase.begin_request());
        assert_eq!(phase, RequestPhase::Idle);
    }

    #[test]
    fn test_busy_phases_share_one_status() {
        assert_eq!(RequestPhase::Idle.status_text(), "Ready");
        assert_eq!(RequestPhase::Validating.status_text(), "Generating response...");
        assert_eq!(RequestPhase::Requesting.status_text(), "Generating response...");
    }
}
