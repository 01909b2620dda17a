//! Session store for the signed-in administrator
//!
//! Wraps the platform storage port. The persisted record is only trusted when
//! it parses, belongs to an admin and has not expired; anything else is
//! removed on load so a stale record cannot grant access on the next boot.

use quizdash_shared::AuthenticatedUser;

use crate::application::dto::AdminSession;
use crate::config::DEFAULT_SESSION_TTL_SECS;
use crate::ports::outbound::{storage_keys, StorageProvider, TimeProvider};

/// Persists the admin session under `adminUser`
#[derive(Clone)]
pub struct SessionStore<P: StorageProvider + TimeProvider> {
    platform: P,
    ttl_secs: i64,
}

impl<P: StorageProvider + TimeProvider> SessionStore<P> {
    pub fn new(platform: P, ttl_secs: i64) -> Self {
        Self { platform, ttl_secs }
    }

    /// Store with the default 12 hour lifetime
    pub fn with_default_ttl(platform: P) -> Self {
        Self::new(platform, DEFAULT_SESSION_TTL_SECS)
    }

    fn now(&self) -> i64 {
        i64::try_from(self.platform.now_unix_secs()).unwrap_or(i64::MAX)
    }

    /// Stamp a freshly authenticated user with its expiry
    pub fn issue(&self, user: AuthenticatedUser) -> AdminSession {
        AdminSession::issue(user, self.now(), self.ttl_secs)
    }

    pub fn save(&self, session: &AdminSession) {
        match serde_json::to_string(session) {
            Ok(json) => {
                self.platform.save(storage_keys::ADMIN_SESSION, &json);
                tracing::debug!(email = %session.email, expires_at = session.expires_at, "Admin session saved");
            }
            Err(e) => tracing::error!("Failed to serialize admin session: {}", e),
        }
    }

    /// Load the persisted session, discarding records that must not be trusted
    pub fn load(&self) -> Option<AdminSession> {
        let raw = self.platform.load(storage_keys::ADMIN_SESSION)?;

        let session = match serde_json::from_str::<AdminSession>(&raw) {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!("Discarding unreadable admin session: {}", e);
                self.clear();
                return None;
            }
        };

        if !session.is_admin() {
            tracing::warn!(role = %session.role, "Discarding stored session without admin role");
            self.clear();
            return None;
        }

        if session.is_expired(self.now()) {
            tracing::info!(expires_at = session.expires_at, "Stored admin session expired");
            self.clear();
            return None;
        }

        Some(session)
    }

    pub fn clear(&self) {
        self.platform.remove(storage_keys::ADMIN_SESSION);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::platform::mock::{
        MockDocumentProvider, MockSleepProvider, MockStorageProvider, MockTimeProvider,
    };
    use crate::state::Platform;
    use quizdash_shared::{EntityId, Role};

    struct Fixture {
        store: SessionStore<Platform>,
        storage: MockStorageProvider,
        clock: MockTimeProvider,
    }

    fn fixture(ttl_secs: i64) -> Fixture {
        let storage = MockStorageProvider::new();
        let clock = MockTimeProvider::at(1_000);
        let platform = Platform::new(
            clock.clone(),
            MockSleepProvider,
            storage.clone(),
            MockDocumentProvider,
        );
        Fixture {
            store: SessionStore::new(platform, ttl_secs),
            storage,
            clock,
        }
    }

    fn admin() -> AuthenticatedUser {
        AuthenticatedUser {
            id: Some(EntityId::Number(7)),
            name: "A".into(),
            email: "a@b.com".into(),
            role: Role::Admin,
            token: None,
            expires_at: None,
        }
    }

    #[test]
    fn saved_session_loads_until_it_expires() {
        let f = fixture(60);
        let session = f.store.issue(admin());
        f.store.save(&session);

        assert_eq!(f.store.load(), Some(session));

        f.clock.advance(60);
        assert_eq!(f.store.load(), None);
        assert!(!f.storage.contains(storage_keys::ADMIN_SESSION));
    }

    #[test]
    fn non_admin_record_is_removed() {
        let f = fixture(60);
        let mut session = f.store.issue(admin());
        session.role = Role::Player;
        f.store.save(&session);

        assert_eq!(f.store.load(), None);
        assert!(!f.storage.contains(storage_keys::ADMIN_SESSION));
    }

    #[test]
    fn unreadable_record_is_removed() {
        let f = fixture(60);
        f.storage.save(storage_keys::ADMIN_SESSION, "{not json");

        assert_eq!(f.store.load(), None);
        assert!(!f.storage.contains(storage_keys::ADMIN_SESSION));
    }

    #[test]
    fn legacy_record_without_expiry_is_removed() {
        let f = fixture(60);
        f.storage.save(
            storage_keys::ADMIN_SESSION,
            r#"{"id":1,"name":"A","email":"a@b.com","role":"admin"}"#,
        );

        assert_eq!(f.store.load(), None);
        assert!(!f.storage.contains(storage_keys::ADMIN_SESSION));
    }

    #[test]
    fn clear_forgets_session() {
        let f = fixture(60);
        f.store.save(&f.store.issue(admin()));
        f.store.clear();

        assert_eq!(f.store.load(), None);
    }

    #[test]
    fn record_uses_shared_key_and_camel_case() {
        let f = fixture(60);
        f.store.save(&f.store.issue(admin()));

        let raw = f.storage.load(storage_keys::ADMIN_SESSION).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["expiresAt"], serde_json::json!(1_060));
        assert_eq!(value["email"], serde_json::json!("a@b.com"));
    }
}
