//! Persisted admin session.

use serde::{Deserialize, Serialize};

use quizdash_shared::{AuthenticatedUser, EntityId, Role};

/// The signed-in administrator as stored under `adminUser`.
///
/// Records written without `expiresAt` deserialize as already expired and are
/// discarded on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSession {
    #[serde(default, alias = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Unix seconds after which the session is no longer trusted
    #[serde(default)]
    pub expires_at: i64,
}

impl AdminSession {
    /// Session for a user the server just authenticated.
    ///
    /// A server-issued expiry wins when it is sooner than the local TTL.
    pub fn issue(user: AuthenticatedUser, now: i64, ttl_secs: i64) -> Self {
        let local_expiry = now.saturating_add(ttl_secs);
        let expires_at = user
            .expires_at
            .map_or(local_expiry, |server| server.min(local_expiry));

        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            token: user.token,
            expires_at,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    pub fn is_expired(&self, now: i64) -> bool {
        now >= self.expires_at
    }

    /// Name shown in the header, falling back to the email
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.email
        } else {
            &self.name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user(expires_at: Option<i64>) -> AuthenticatedUser {
        AuthenticatedUser {
            id: Some(EntityId::Number(1)),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            role: Role::Admin,
            token: Some("t".into()),
            expires_at,
        }
    }

    #[test]
    fn issue_uses_local_ttl_without_server_expiry() {
        let session = AdminSession::issue(user(None), 1_000, 60);
        assert_eq!(session.expires_at, 1_060);
        assert!(!session.is_expired(1_059));
        assert!(session.is_expired(1_060));
    }

    #[test]
    fn sooner_server_expiry_wins() {
        assert_eq!(AdminSession::issue(user(Some(1_010)), 1_000, 60).expires_at, 1_010);
        assert_eq!(AdminSession::issue(user(Some(9_999)), 1_000, 60).expires_at, 1_060);
    }

    #[test]
    fn legacy_record_without_expiry_is_expired() {
        let legacy: AdminSession =
            serde_json::from_value(json!({"id": 1, "name": "Ada", "role": "admin"})).unwrap();
        assert!(legacy.is_admin());
        assert!(legacy.is_expired(0));
    }

    #[test]
    fn stored_form_is_camel_case() {
        let session = AdminSession::issue(user(None), 0, 10);
        let value = serde_json::to_value(&session).unwrap();
        assert_eq!(value["expiresAt"], json!(10));
        assert_eq!(value["role"], json!("admin"));
    }

    #[test]
    fn display_name_falls_back_to_email() {
        let mut session = AdminSession::issue(user(None), 0, 10);
        assert_eq!(session.display_name(), "Ada");
        session.name.clear();
        assert_eq!(session.display_name(), "ada@example.com");
    }
}
