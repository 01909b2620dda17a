//! Login/registration state machine
//!
//! Pure state: the services perform the requests, the UI feeds the outcome
//! back in as [`AuthEvent`]s.

use crate::application::dto::AdminSession;

/// Which screen of the sign-in flow is active
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AuthFlow {
    /// Before boot has looked at storage, or right after logout
    #[default]
    LoggedOut,
    ShowingLogin,
    ShowingRegister,
    LoggedIn(AdminSession),
}

#[derive(Debug, Clone, PartialEq)]
pub enum AuthEvent {
    /// Result of reading the session store on startup
    Boot(Option<AdminSession>),
    ShowLogin,
    ShowRegister,
    /// Login or registration succeeded
    Authenticated(AdminSession),
    LogOut,
}

impl AuthFlow {
    /// Next state for `event`. Transitions that make no sense in the current
    /// state leave it unchanged.
    pub fn apply(&self, event: AuthEvent) -> AuthFlow {
        match (self, event) {
            (_, AuthEvent::Boot(Some(session))) if session.is_admin() => {
                AuthFlow::LoggedIn(session)
            }
            (_, AuthEvent::Boot(_)) => AuthFlow::ShowingLogin,
            (_, AuthEvent::LogOut) => AuthFlow::LoggedOut,
            (AuthFlow::LoggedIn(_), AuthEvent::ShowLogin | AuthEvent::ShowRegister) => self.clone(),
            (_, AuthEvent::ShowLogin) => AuthFlow::ShowingLogin,
            (_, AuthEvent::ShowRegister) => AuthFlow::ShowingRegister,
            (AuthFlow::LoggedIn(_), AuthEvent::Authenticated(_)) => self.clone(),
            (_, AuthEvent::Authenticated(session)) if session.is_admin() => {
                AuthFlow::LoggedIn(session)
            }
            (_, AuthEvent::Authenticated(session)) => {
                tracing::warn!(role = %session.role, "Ignoring non-admin session");
                self.clone()
            }
        }
    }

    pub fn is_logged_in(&self) -> bool {
        matches!(self, AuthFlow::LoggedIn(_))
    }

    pub fn session(&self) -> Option<&AdminSession> {
        match self {
            AuthFlow::LoggedIn(session) => Some(session),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizdash_shared::Role;

    fn session(role: Role) -> AdminSession {
        AdminSession {
            id: None,
            name: "A".into(),
            email: "a@b.com".into(),
            role,
            token: None,
            expires_at: 100,
        }
    }

    #[test]
    fn boot_with_valid_session_is_logged_in() {
        let flow = AuthFlow::default().apply(AuthEvent::Boot(Some(session(Role::Admin))));
        assert!(flow.is_logged_in());
        assert_eq!(flow.session().map(|s| s.name.as_str()), Some("A"));
    }

    #[test]
    fn boot_without_session_shows_login() {
        assert_eq!(
            AuthFlow::default().apply(AuthEvent::Boot(None)),
            AuthFlow::ShowingLogin
        );
        assert_eq!(
            AuthFlow::default().apply(AuthEvent::Boot(Some(session(Role::Player)))),
            AuthFlow::ShowingLogin
        );
    }

    #[test]
    fn user_toggles_between_forms() {
        let flow = AuthFlow::ShowingLogin.apply(AuthEvent::ShowRegister);
        assert_eq!(flow, AuthFlow::ShowingRegister);
        assert_eq!(flow.apply(AuthEvent::ShowLogin), AuthFlow::ShowingLogin);
    }

    #[test]
    fn only_admin_sessions_log_in() {
        let denied = AuthFlow::ShowingLogin.apply(AuthEvent::Authenticated(session(Role::Player)));
        assert_eq!(denied, AuthFlow::ShowingLogin);

        let granted =
            AuthFlow::ShowingRegister.apply(AuthEvent::Authenticated(session(Role::Admin)));
        assert!(granted.is_logged_in());
    }

    #[test]
    fn logout_then_boot_shows_login() {
        let flow = AuthFlow::LoggedIn(session(Role::Admin)).apply(AuthEvent::LogOut);
        assert_eq!(flow, AuthFlow::LoggedOut);
        assert_eq!(flow.apply(AuthEvent::ShowLogin), AuthFlow::ShowingLogin);
        assert_eq!(flow.apply(AuthEvent::Boot(None)), AuthFlow::ShowingLogin);
    }

    #[test]
    fn forms_are_unreachable_while_logged_in() {
        let flow = AuthFlow::LoggedIn(session(Role::Admin));
        assert_eq!(flow.apply(AuthEvent::ShowRegister), flow);
    }
}
