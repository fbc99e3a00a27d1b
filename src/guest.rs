//! Guest Chat Widget
//!
//! Floating chat over public documents, offered only to visitors without a
//! session. Its log lives as long as the widget itself; collapsing the
//! panel keeps the messages.

use crate::chat::{ChatKind, ChatLog};
use crate::session::SessionStore;

/// How the widget should be drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuestVisibility {
    /// Session loading or authenticated: nothing is rendered
    Hidden,
    /// Launcher button only
    Collapsed,
    /// Open panel with the message list and input
    Expanded,
}

/// Guest widget state
#[derive(Debug, Clone)]
pub struct GuestWidget {
    open: bool,
    chat: ChatLog,
}

impl Default for GuestWidget {
    fn default() -> Self {
        Self::new()
    }
}

impl GuestWidget {
    pub fn new() -> Self {
        Self {
            open: false,
            chat: ChatLog::new(ChatKind::Guest),
        }
    }

    /// Visibility from the raw auth flags
    pub fn visibility_for(&self, loading: bool, authenticated: bool) -> GuestVisibility {
        if loading || authenticated {
            GuestVisibility::Hidden
        } else if self.open {
            GuestVisibility::Expanded
        } else {
            GuestVisibility::Collapsed
        }
    }

    pub fn visibility(&self, session: &SessionStore) -> GuestVisibility {
        self.visibility_for(session.is_loading(), session.is_authenticated())
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub fn chat(&self) -> &ChatLog {
        &self.chat
    }

    pub fn chat_mut(&mut self) -> &mut ChatLog {
        &mut self.chat
    }
}
