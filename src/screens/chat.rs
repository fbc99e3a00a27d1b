//! Chat controller
//!
//! One controller for both conversations; the [`ChatKind`] picks the
//! endpoint, greeting and fallback text.

use std::sync::{Arc, Mutex};

use super::lock;
use crate::api::Backend;
use crate::chat::{ChatKind, ChatLog, ChatMessage, HISTORY_ERROR};
use crate::error::{ClientError, ClientResult};
use crate::lifecycle::ScreenScope;
use crate::model::ChatReply;

/// Controller for the private chat screen and the guest widget
pub struct ChatScreen {
    backend: Arc<dyn Backend>,
    scope: ScreenScope,
    log: Mutex<ChatLog>,
    history_error: Mutex<Option<String>>,
}

impl ChatScreen {
    /// Authenticated chat over the user's own documents
    pub fn private(backend: Arc<dyn Backend>) -> Self {
        Self::new(backend, ChatKind::Private)
    }

    /// Visitor chat over public documents
    pub fn guest(backend: Arc<dyn Backend>) -> Self {
        Self::new(backend, ChatKind::Guest)
    }

    fn new(backend: Arc<dyn Backend>, kind: ChatKind) -> Self {
        Self {
            backend,
            scope: ScreenScope::new(),
            log: Mutex::new(ChatLog::new(kind)),
            history_error: Mutex::new(None),
        }
    }

    pub fn kind(&self) -> ChatKind {
        lock(&self.log).kind()
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        lock(&self.log).messages().to_vec()
    }

    pub fn is_pending(&self) -> bool {
        lock(&self.log).is_pending()
    }

    pub fn history_error(&self) -> Option<String> {
        lock(&self.history_error).clone()
    }

    pub fn dispose(&self) {
        self.scope.invalidate();
    }

    /// Replace the greeting with the stored conversation. On failure the
    /// log is kept and an inline error is set.
    pub async fn load_history(&self) -> ClientResult<()> {
        if self.kind() != ChatKind::Private {
            return Ok(());
        }

        let ticket = self.scope.ticket();
        let outcome = self.backend.private_history().await;

        match outcome {
            Ok(history) => {
                tracing::debug!(exchanges = history.len(), "Chat history loaded");
                ticket.apply(|| {
                    lock(&self.log).load_history(&history);
                    *lock(&self.history_error) = None;
                });
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Failed to load chat history: {}", e);
                ticket.apply(|| *lock(&self.history_error) = Some(HISTORY_ERROR.to_string()));
                Err(e)
            }
        }
    }

    /// Send `input` and wait for the assistant's answer.
    ///
    /// Returns the assistant message that was appended: the reply, or the
    /// fallback when the call failed. Only a rejected send (empty input,
    /// reply still pending) or an expired session is an error; in the
    /// latter case the fallback has been appended as well.
    pub async fn send(&self, input: &str) -> ClientResult<ChatMessage> {
        let (text, kind) = {
            let mut log = lock(&self.log);
            let kind = log.kind();
            match log.begin_send(input) {
                Some(text) => (text, kind),
                None => {
                    return Err(ClientError::Validation(
                        "Message is empty or a reply is still pending".to_string(),
                    ))
                }
            }
        };

        let ticket = self.scope.ticket();
        let outcome = match kind {
            ChatKind::Private => self.backend.send_private(&text).await,
            ChatKind::Guest => self.backend.send_public(&text).await,
        };

        let unauthorized = matches!(outcome, Err(ClientError::Unauthorized));
        let reply = outcome.and_then(ChatReply::into_text);

        let appended = ticket.apply(|| {
            let mut log = lock(&self.log);
            log.finish(reply);
            log.messages().last().cloned()
        });

        if unauthorized {
            return Err(ClientError::Unauthorized);
        }

        appended
            .flatten()
            .ok_or_else(|| ClientError::Validation("Chat was closed".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::{Role, HISTORY_WELCOME};
    use crate::model::Conversation;
    use crate::screens::fake::{FakeBackend, Gate};

    fn conv(query: &str, answer: &str) -> Conversation {
        Conversation {
            id: None,
            query: query.to_string(),
            answer: answer.to_string(),
            created_at: None,
            sources: None,
        }
    }

    #[tokio::test]
    async fn test_user_message_visible_while_pending() {
        let gate = Arc::new(Gate::default());
        let screen = Arc::new(ChatScreen::private(Arc::new(FakeBackend {
            reply: Some("The report is due Friday.".to_string()),
            gate: Some(gate.clone()),
            ..Default::default()
        })));

        let task = {
            let screen = Arc::clone(&screen);
            tokio::spawn(async move { screen.send("When is the report due?").await })
        };

        gate.entered.notified().await;
        let mid_flight = screen.messages();
        assert_eq!(mid_flight.len(), 2);
        assert_eq!(mid_flight[1].role, Role::User);
        assert_eq!(mid_flight[1].text, "When is the report due?");
        assert!(screen.is_pending());

        gate.release.notify_one();
        let reply = task.await.unwrap().unwrap();

        assert_eq!(reply.text, "The report is due Friday.");
        assert_eq!(screen.messages().len(), 3);
        assert!(!screen.is_pending());
    }

    #[tokio::test]
    async fn test_failed_send_appends_single_fallback() {
        let screen = ChatScreen::private(Arc::new(FakeBackend::default()));

        let reply = screen.send("hello").await.unwrap();

        assert_eq!(
            reply.text,
            "Sorry, something went wrong while processing your message."
        );
        let messages = screen.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(
            messages.iter().filter(|m| m.role == Role::Assistant).count(),
            2
        );
    }

    #[tokio::test]
    async fn test_guest_uses_public_endpoint() {
        let backend = Arc::new(FakeBackend {
            reply: Some("Hello visitor".to_string()),
            ..Default::default()
        });
        let screen = ChatScreen::guest(backend.clone());

        screen.send("hi").await.unwrap();
        assert_eq!(backend.calls(), vec!["public hi"]);

        let failing = ChatScreen::guest(Arc::new(FakeBackend::default()));
        let reply = failing.send("hi").await.unwrap();
        assert_eq!(reply.text, "Sorry, something went wrong.");
    }

    #[tokio::test]
    async fn test_history_replaces_greeting() {
        let screen = ChatScreen::private(Arc::new(FakeBackend {
            history: Some(vec![conv("q1", "a1")]),
            ..Default::default()
        }));
        assert_eq!(
            screen.messages()[0].text,
            "Welcome! Ask me something about your uploaded documents."
        );

        screen.load_history().await.unwrap();

        let texts: Vec<String> = screen.messages().into_iter().map(|m| m.text).collect();
        assert_eq!(texts, vec![HISTORY_WELCOME, "q1", "a1"]);
    }

    #[tokio::test]
    async fn test_history_failure_keeps_greeting() {
        let screen = ChatScreen::private(Arc::new(FakeBackend::default()));

        assert!(screen.load_history().await.is_err());

        assert_eq!(screen.history_error().as_deref(), Some(HISTORY_ERROR));
        assert_eq!(screen.messages().len(), 1);
    }

    #[tokio::test]
    async fn test_disposed_screen_drops_late_history() {
        let gate = Arc::new(Gate::default());
        let screen = Arc::new(ChatScreen::private(Arc::new(FakeBackend {
            history: Some(vec![conv("q1", "a1")]),
            gate: Some(gate.clone()),
            ..Default::default()
        })));

        let task = {
            let screen = Arc::clone(&screen);
            tokio::spawn(async move { screen.load_history().await })
        };

        gate.entered.notified().await;
        screen.dispose();
        gate.release.notify_one();
        task.await.unwrap().unwrap();

        assert_eq!(screen.messages().len(), 1);
        assert_ne!(screen.messages()[0].text, HISTORY_WELCOME);
    }

    #[tokio::test]
    async fn test_unauthorized_send_still_closes_exchange() {
        let screen = ChatScreen::private(Arc::new(FakeBackend {
            unauthorized: true,
            reply: Some("unused".to_string()),
            ..Default::default()
        }));

        assert!(screen.send("hi").await.unwrap_err().is_unauthorized());
        assert_eq!(screen.messages().len(), 3);
        assert!(!screen.is_pending());
    }

    #[tokio::test]
    async fn test_empty_input_rejected() {
        let backend = Arc::new(FakeBackend::default());
        let screen = ChatScreen::private(backend.clone());

        assert!(screen.send("   ").await.is_err());
        assert!(backend.calls().is_empty());
        assert_eq!(screen.messages().len(), 1);
    }
}
