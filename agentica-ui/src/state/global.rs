//! Global Application State
//!
//! The session store lives here, mirrored into signals so views react to
//! login, logout and hydration.

use leptos::*;
use std::rc::Rc;

use agentica::model::User;
use agentica::session::{Credentials, SessionStore};
use agentica::{ClientResult, Route};

use crate::storage::LocalStorage;

/// Global application state provided to all components
#[derive(Clone)]
pub struct GlobalState {
    session: Rc<SessionStore>,
    /// Identity of the active session
    pub user: RwSignal<Option<User>>,
    /// True until the persisted session has been read
    pub loading: RwSignal<bool>,
    /// Error message to display
    pub error: RwSignal<Option<String>>,
    /// Success message (for toasts)
    pub success: RwSignal<Option<String>>,
}

/// Provide global state to the component tree
pub fn provide_global_state() -> GlobalState {
    let state = GlobalState {
        session: Rc::new(SessionStore::new(LocalStorage)),
        user: create_rw_signal(None),
        loading: create_rw_signal(true),
        error: create_rw_signal(None),
        success: create_rw_signal(None),
    };

    provide_context(state.clone());
    state
}

impl GlobalState {
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Restore the persisted session, once at startup
    pub fn hydrate(&self) {
        self.session.hydrate();
        self.sync();
    }

    /// Copy the store into the signals
    fn sync(&self) {
        self.user.set(self.session.user());
        self.loading.set(self.session.is_loading());
    }

    pub fn login(&self, credentials: &Credentials) -> ClientResult<()> {
        let result = self.session.login(credentials);
        self.sync();
        result
    }

    /// Clear the session; returns where to navigate
    pub fn logout(&self) -> Route {
        let next = self.session.logout();
        self.sync();
        next
    }

    /// Status hook for every bearer response. A 401 logs out and the
    /// route guards take the user to the login screen.
    pub fn check_status(&self, status: u16) -> ClientResult<()> {
        let result = self.session.check_status(status);
        if result.is_err() {
            self.sync();
            self.show_error("Your session has expired. Please log in again.");
        }
        result
    }

    /// Show a success message (auto-clears after timeout)
    pub fn show_success(&self, message: &str) {
        self.success.set(Some(message.to_string()));

        let success_signal = self.success;
        gloo_timers::callback::Timeout::new(3000, move || {
            success_signal.set(None);
        })
        .forget();
    }

    /// Show an error message (auto-clears after timeout)
    pub fn show_error(&self, message: &str) {
        self.error.set(Some(message.to_string()));

        let error_signal = self.error;
        gloo_timers::callback::Timeout::new(5000, move || {
            error_signal.set(None);
        })
        .forget();
    }
}
