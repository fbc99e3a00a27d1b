//! Login and registration
//!
//! Both forms end the same way: the returned credentials and identity are
//! stored in the session and the shell is sent to the dashboard.

use std::sync::{Arc, Mutex};

use super::lock;
use crate::api::Backend;
use crate::error::{ClientError, ClientResult};
use crate::form::FormState;
use crate::lifecycle::{ScreenScope, Ticket};
use crate::model::{AuthResponse, LoginRequest, RegisterRequest};
use crate::routes::Route;
use crate::session::SessionStore;

/// Controller for the login and register screens
pub struct AuthScreen {
    backend: Arc<dyn Backend>,
    session: Arc<SessionStore>,
    scope: ScreenScope,
    state: Mutex<FormState>,
}

impl AuthScreen {
    pub fn new(backend: Arc<dyn Backend>, session: Arc<SessionStore>) -> Self {
        Self {
            backend,
            session,
            scope: ScreenScope::new(),
            state: Mutex::new(FormState::Idle),
        }
    }

    pub fn state(&self) -> FormState {
        lock(&self.state).clone()
    }

    pub fn dispose(&self) {
        self.scope.invalidate();
    }

    pub async fn login(&self, username: &str, password: &str) -> ClientResult<Route> {
        require("username", username)?;
        require("password", password)?;

        let request = LoginRequest {
            username: username.trim().to_string(),
            password: password.to_string(),
        };

        self.begin()?;
        let ticket = self.scope.ticket();
        let outcome = self.backend.login(&request).await;
        self.complete(outcome, &ticket)
    }

    pub async fn register(&self, username: &str, email: &str, password: &str) -> ClientResult<Route> {
        require("username", username)?;
        require("email", email)?;
        require("password", password)?;

        let request = RegisterRequest {
            username: username.trim().to_string(),
            email: email.trim().to_string(),
            password: password.to_string(),
        };

        self.begin()?;
        let ticket = self.scope.ticket();
        let outcome = self.backend.register(&request).await;
        self.complete(outcome, &ticket)
    }

    fn begin(&self) -> ClientResult<()> {
        if lock(&self.state).begin() {
            Ok(())
        } else {
            Err(ClientError::Validation("Already submitting".to_string()))
        }
    }

    /// The session is process-wide, so credentials are stored even when
    /// the form has gone away. Only the form state is guarded by the ticket.
    fn complete(
        &self,
        outcome: ClientResult<AuthResponse>,
        ticket: &Ticket,
    ) -> ClientResult<Route> {
        let result = outcome.and_then(|credentials| self.session.login(&credentials));

        ticket.apply(|| lock(&self.state).finish(&result));

        result.map(|()| Route::Dashboard)
    }
}

fn require(field: &str, value: &str) -> ClientResult<()> {
    if value.trim().is_empty() {
        return Err(ClientError::Validation(format!("{}: This field may not be blank.", field)));
    }
    Ok(())
}
