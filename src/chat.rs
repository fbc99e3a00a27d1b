//! Chat Log
//!
//! Message list plus send state for the private chat screen and the guest
//! widget. Both follow the same cycle:
//!
//! ```text
//! Idle --begin_send--> Pending --finish--> Idle
//! ```
//!
//! `begin_send` appends the user's message before any request is made;
//! `finish` appends exactly one assistant message, either the reply or a
//! fixed fallback. Messages are never edited, reordered or withdrawn.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::form::FormState;
use crate::model::Conversation;

/// Who wrote a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A rendered chat bubble
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self::at(Role::User, text, Utc::now())
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::at(Role::Assistant, text, Utc::now())
    }

    pub fn at(role: Role, text: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            role,
            text: text.into(),
            timestamp,
        }
    }
}

/// Which conversation a log belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatKind {
    /// Authenticated chat over the user's private documents
    Private,
    /// Unauthenticated widget over public documents
    Guest,
}

impl ChatKind {
    /// First bubble before anything else is known
    pub fn greeting(&self) -> &'static str {
        match self {
            ChatKind::Private => "Welcome! Ask me something about your uploaded documents.",
            ChatKind::Guest => "Hi! How can I assist you today?",
        }
    }

    /// Bubble shown in place of a reply when the send fails
    pub fn fallback(&self) -> &'static str {
        match self {
            ChatKind::Private => "Sorry, something went wrong while processing your message.",
            ChatKind::Guest => "Sorry, something went wrong.",
        }
    }
}

/// Greeting shown above loaded history
pub const HISTORY_WELCOME: &str = "Welcome! What do we get started with?";

/// Inline error when history cannot be loaded
pub const HISTORY_ERROR: &str = "Could not load chat history.";

/// Messages and send state of one conversation
#[derive(Debug, Clone)]
pub struct ChatLog {
    kind: ChatKind,
    messages: Vec<ChatMessage>,
    /// Leading messages that came from the greeting or loaded history
    preamble: usize,
    state: FormState,
}

impl ChatLog {
    pub fn new(kind: ChatKind) -> Self {
        Self {
            kind,
            messages: vec![ChatMessage::assistant(kind.greeting())],
            preamble: 1,
            state: FormState::Idle,
        }
    }

    pub fn kind(&self) -> ChatKind {
        self.kind
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn is_pending(&self) -> bool {
        self.state.is_pending()
    }

    /// Whether the send control is enabled for the current input
    pub fn can_send(&self, input: &str) -> bool {
        self.state.can_submit(!input.trim().is_empty())
    }

    /// Replace the greeting with the welcome bubble followed by `history`,
    /// each exchange expanded into a user/assistant pair. Messages sent
    /// while history was loading stay after it. A missing timestamp shows
    /// as now.
    pub fn load_history(&mut self, history: &[Conversation]) {
        let now = Utc::now();
        let sent = self.messages.split_off(self.preamble.min(self.messages.len()));

        let mut messages = Vec::with_capacity(history.len() * 2 + 1 + sent.len());
        messages.push(ChatMessage::at(Role::Assistant, HISTORY_WELCOME, now));

        for conv in history {
            let at = conv.created_at.unwrap_or(now);
            messages.push(ChatMessage::at(Role::User, conv.query.clone(), at));
            messages.push(ChatMessage::at(Role::Assistant, conv.answer.clone(), at));
        }

        self.preamble = messages.len();
        messages.extend(sent);
        self.messages = messages;
    }

    /// Start sending `input`. The trimmed text is appended as a user message
    /// and returned for the request. Empty input, or a send already in
    /// flight, returns `None` and changes nothing.
    pub fn begin_send(&mut self, input: &str) -> Option<String> {
        let text = input.trim();
        if text.is_empty() || self.is_pending() {
            return None;
        }

        self.messages.push(ChatMessage::user(text));
        self.state.begin();
        Some(text.to_string())
    }

    /// Complete the pending send. `Ok(reply)` appends the reply, anything
    /// else appends the fallback. Ignored when nothing is pending.
    pub fn finish<E: std::fmt::Display>(&mut self, outcome: Result<String, E>) {
        if !self.is_pending() {
            tracing::warn!("Chat reply arrived with no send in flight");
            return;
        }

        let text = match outcome {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(kind = ?self.kind, "Chat send failed: {}", e);
                self.kind.fallback().to_string()
            }
        };

        self.messages.push(ChatMessage::assistant(text));
        self.state = FormState::Idle;
    }
}
