//! Form State
//!
//! One small state machine per interactive form instead of a loose pair of
//! `loading`/`error` flags.

/// Submission state of a form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FormState {
    #[default]
    Idle,
    Pending,
    Error(String),
}

impl FormState {
    pub fn is_pending(&self) -> bool {
        matches!(self, FormState::Pending)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            FormState::Error(msg) => Some(msg),
            _ => None,
        }
    }

    /// Whether the submit control is enabled. `ready` is the form's own
    /// input check (non-empty message, file selected, ...).
    pub fn can_submit(&self, ready: bool) -> bool {
        ready && !self.is_pending()
    }

    /// Enter `Pending`. Returns false (and changes nothing) when a
    /// submission is already in flight.
    pub fn begin(&mut self) -> bool {
        if self.is_pending() {
            return false;
        }
        *self = FormState::Pending;
        true
    }

    /// Leave `Pending` with the outcome of the submission
    pub fn finish<T, E: ToString>(&mut self, outcome: &Result<T, E>) {
        *self = match outcome {
            Ok(_) => FormState::Idle,
            Err(e) => FormState::Error(e.to_string()),
        };
    }
}
