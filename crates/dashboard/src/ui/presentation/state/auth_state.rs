//! Auth flow state
//!
//! Wraps the [`AuthFlow`] state machine in a signal so routes re-render when
//! the admin signs in or out.

use dioxus::prelude::*;

use crate::application::auth_flow::{AuthEvent, AuthFlow};
use crate::application::dto::AdminSession;

#[derive(Clone, Copy)]
pub struct AuthState {
    flow: Signal<AuthFlow>,
}

impl AuthState {
    /// Create a new AuthState before boot has read the session store
    pub fn new() -> Self {
        Self {
            flow: Signal::new(AuthFlow::default()),
        }
    }

    /// State after boot read `restored` from the session store
    pub fn boot(restored: Option<AdminSession>) -> Self {
        Self {
            flow: Signal::new(AuthFlow::default().apply(AuthEvent::Boot(restored))),
        }
    }

    pub fn flow(&self) -> AuthFlow {
        self.flow.read().clone()
    }

    pub fn session(&self) -> Option<AdminSession> {
        self.flow.read().session().cloned()
    }

    pub fn is_logged_in(&self) -> bool {
        self.flow.read().is_logged_in()
    }

    pub fn apply(&mut self, event: AuthEvent) {
        let next = self.flow.peek().apply(event);
        tracing::debug!(?next, "Auth flow transition");
        self.flow.set(next);
    }
}

impl Default for AuthState {
    fn default() -> Self {
        Self::new()
    }
}

pub fn use_auth_state() -> AuthState {
    use_context::<AuthState>()
}
