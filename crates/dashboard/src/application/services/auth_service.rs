//! Auth Service - admin login, registration and logout
//!
//! Validates the forms locally, talks to the users API and persists the
//! resulting session through the [`SessionStore`]. Only sessions with the
//! admin role are ever persisted or given a bearer token.

use quizdash_shared::{AuthenticatedUser, LoginRequest, RegisterAdminRequest, Role};

use crate::application::dto::AdminSession;
use crate::application::error::ServiceError;
use crate::application::services::SessionStore;
use crate::ports::outbound::{ApiError, ApiPort, StorageProvider, TimeProvider};

/// Minimum length of a new admin password
pub const MIN_PASSWORD_LEN: usize = 4;

pub const MSG_FILL_ALL_FIELDS: &str = "Please fill in all fields";
pub const MSG_ALL_FIELDS_REQUIRED: &str = "All fields are required";
pub const MSG_PASSWORD_TOO_SHORT: &str = "Password must be at least 4 characters";
pub const MSG_ADMIN_ONLY: &str = "Access denied: only administrators can sign in here";
pub const MSG_NO_PERMISSION: &str = "You do not have permission to access the dashboard";
pub const MSG_INVALID_CREDENTIALS: &str = "Invalid email or password";
pub const MSG_EMAIL_IN_USE: &str = "Email already in use";

/// Check the login form. Values are checked trimmed and sent as typed.
pub fn validate_login(email: &str, password: &str) -> Result<(), ServiceError> {
    if email.trim().is_empty() || password.trim().is_empty() {
        return Err(ServiceError::Validation(MSG_FILL_ALL_FIELDS.into()));
    }
    Ok(())
}

/// Check the registration form
pub fn validate_registration(name: &str, email: &str, password: &str) -> Result<(), ServiceError> {
    if name.trim().is_empty() || email.trim().is_empty() || password.trim().is_empty() {
        return Err(ServiceError::Validation(MSG_ALL_FIELDS_REQUIRED.into()));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ServiceError::Validation(MSG_PASSWORD_TOO_SHORT.into()));
    }
    Ok(())
}

/// Replace an empty server message with a contextual default
fn with_default_message(err: ApiError, status: u16, default: &str) -> ApiError {
    match err {
        ApiError::HttpError { status: s, message } if s == status && message.trim().is_empty() => {
            ApiError::HttpError {
                status,
                message: default.to_string(),
            }
        }
        other => other,
    }
}

/// Authentication use cases for the dashboard
#[derive(Clone)]
pub struct AuthService<A: ApiPort, P: StorageProvider + TimeProvider> {
    api: A,
    sessions: SessionStore<P>,
}

impl<A: ApiPort, P: StorageProvider + TimeProvider> AuthService<A, P> {
    pub fn new(api: A, sessions: SessionStore<P>) -> Self {
        Self { api, sessions }
    }

    pub fn sessions(&self) -> &SessionStore<P> {
        &self.sessions
    }

    /// Sign in an administrator.
    ///
    /// The server is asked to reject non-admin accounts; the role is checked
    /// again here and a non-admin answer is refused without persisting anything.
    pub async fn login(&self, email: &str, password: &str) -> Result<AdminSession, ServiceError> {
        validate_login(email, password)?;

        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
            require_admin: true,
        };
        let user: AuthenticatedUser = self
            .api
            .post("/api/users/login", &request)
            .await
            .map_err(|e| with_default_message(e, 401, MSG_INVALID_CREDENTIALS))
            .map_err(|e| with_default_message(e, 403, MSG_NO_PERMISSION))?;

        if !user.role.is_admin() {
            tracing::warn!(email = %user.email, role = %user.role, "Login refused for non-admin account");
            return Err(ServiceError::Auth(MSG_ADMIN_ONLY.into()));
        }

        let session = self.establish(user);
        tracing::info!(email = %session.email, "Admin signed in");
        Ok(session)
    }

    /// Create a new administrator account and sign it in.
    pub async fn register_admin(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AdminSession, ServiceError> {
        validate_registration(name, email, password)?;

        let request = RegisterAdminRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        let mut user: AuthenticatedUser = self
            .api
            .post("/api/users/admin", &request)
            .await
            .map_err(|e| with_default_message(e, 409, MSG_EMAIL_IN_USE))?;

        // The endpoint only creates admins; older servers leave the role out.
        match user.role {
            Role::Admin => {}
            Role::Unknown => user.role = Role::Admin,
            Role::Player => {
                tracing::warn!(email = %user.email, "Registration returned a non-admin account");
                return Err(ServiceError::Auth(MSG_ADMIN_ONLY.into()));
            }
        }

        let session = self.establish(user);
        tracing::info!(email = %session.email, "Admin account created");
        Ok(session)
    }

    fn establish(&self, user: AuthenticatedUser) -> AdminSession {
        let session = self.sessions.issue(user);
        self.sessions.save(&session);
        self.api.set_bearer_token(session.token.clone());
        session
    }

    /// Resume a persisted session on boot
    pub fn restore(&self) -> Option<AdminSession> {
        let session = self.sessions.load()?;
        self.api.set_bearer_token(session.token.clone());
        Some(session)
    }

    pub fn logout(&self) {
        self.sessions.clear();
        self.api.set_bearer_token(None);
        tracing::info!("Admin signed out");
    }
}
