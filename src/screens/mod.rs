//! Screen Controllers
//!
//! Async drivers for the login/register, dashboard and chat screens. Each
//! controller owns its state behind a `Mutex` (never held across an
//! `.await`) and a [`ScreenScope`](crate::lifecycle::ScreenScope);
//! `dispose` drops any response still in flight.
//!
//! The CLI drives these directly. The browser frontend drives the same
//! state types through its own reactive signals.

mod auth;
mod chat;
mod dashboard;

#[cfg(test)]
pub(crate) mod fake;

pub use auth::AuthScreen;
pub use chat::ChatScreen;
pub use dashboard::DashboardScreen;

use std::sync::{Mutex, MutexGuard};

/// Lock a screen's state, recovering from a poisoned lock
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}
