//! Screen Lifetime Guard
//!
//! Requests cannot be cancelled once sent. Instead, each screen instance
//! owns a [`ScreenScope`] and every request carries a [`Ticket`] taken when
//! it started. Disposing the screen bumps the generation, so responses that
//! arrive afterwards see a stale ticket and are dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Generation counter for one screen instance
#[derive(Debug, Clone, Default)]
pub struct ScreenScope {
    generation: Arc<AtomicU64>,
}

impl ScreenScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag a request with the current generation
    pub fn ticket(&self) -> Ticket {
        Ticket {
            issued: self.generation.load(Ordering::SeqCst),
            generation: Arc::clone(&self.generation),
        }
    }

    /// The screen went away or was replaced: every outstanding ticket is stale
    pub fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}

/// Proof that a response still belongs to a live screen
#[derive(Debug, Clone)]
pub struct Ticket {
    issued: u64,
    generation: Arc<AtomicU64>,
}

impl Ticket {
    pub fn is_current(&self) -> bool {
        self.generation.load(Ordering::SeqCst) == self.issued
    }

    /// Run `apply` only if the screen is still live
    pub fn apply<T>(&self, apply: impl FnOnce() -> T) -> Option<T> {
        if self.is_current() {
            Some(apply())
        } else {
            tracing::debug!("Dropping response for a disposed screen");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticket_current_until_invalidated() {
        let scope = ScreenScope::new();
        let ticket = scope.ticket();
        assert!(ticket.is_current());
        assert_eq!(ticket.apply(|| 1), Some(1));

        scope.invalidate();
        assert!(!ticket.is_current());
        assert_eq!(ticket.apply(|| 1), None);

        assert!(scope.ticket().is_current());
    }

    #[test]
    fn test_clones_share_generation() {
        let scope = ScreenScope::new();
        let ticket = scope.ticket();
        scope.clone().invalidate();
        assert!(!ticket.is_current());
    }
}
