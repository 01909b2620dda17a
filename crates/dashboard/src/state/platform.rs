//! Platform DI Container
//!
//! This module provides the `Platform` struct - a dependency injection container
//! that aggregates all platform-specific service implementations behind port traits.
//!
//! Usage:
//! - Created by `create_platform()` in infrastructure/platform/desktop.rs or wasm.rs
//! - Injected into Dioxus context by `main`
//! - Accessed in UI via `use_context::<Platform>()`

use std::{future::Future, pin::Pin, sync::Arc};

use crate::ports::outbound::{DocumentProvider, SleepProvider, StorageProvider, TimeProvider};

/// Unified platform services container
#[derive(Clone)]
pub struct Platform {
    time: Arc<dyn TimeProviderDyn>,
    sleep: Arc<dyn SleepProviderDyn>,
    storage: Arc<dyn StorageProviderDyn>,
    document: Arc<dyn DocumentProviderDyn>,
}

// =============================================================================
// Dynamic trait versions for Arc storage (need Send + Sync for Dioxus context)
// =============================================================================

trait TimeProviderDyn: Send + Sync {
    fn now_unix_secs(&self) -> u64;
    fn now_millis(&self) -> u64;
}

trait SleepProviderDyn: Send + Sync {
    fn sleep_ms(&self, ms: u64) -> Pin<Box<dyn Future<Output = ()> + 'static>>;
}

trait StorageProviderDyn: Send + Sync {
    fn save(&self, key: &str, value: &str);
    fn load(&self, key: &str) -> Option<String>;
    fn remove(&self, key: &str);
}

trait DocumentProviderDyn: Send + Sync {
    fn set_page_title(&self, title: &str);
}

// =============================================================================
// Blanket implementations - convert port traits to dyn-safe wrappers
// =============================================================================

impl<T: TimeProvider + Send + Sync> TimeProviderDyn for T {
    fn now_unix_secs(&self) -> u64 {
        TimeProvider::now_unix_secs(self)
    }
    fn now_millis(&self) -> u64 {
        TimeProvider::now_millis(self)
    }
}

impl<T: SleepProvider + Send + Sync> SleepProviderDyn for T {
    fn sleep_ms(&self, ms: u64) -> Pin<Box<dyn Future<Output = ()> + 'static>> {
        SleepProvider::sleep_ms(self, ms)
    }
}

impl<T: StorageProvider + Send + Sync> StorageProviderDyn for T {
    fn save(&self, key: &str, value: &str) {
        StorageProvider::save(self, key, value)
    }
    fn load(&self, key: &str) -> Option<String> {
        StorageProvider::load(self, key)
    }
    fn remove(&self, key: &str) {
        StorageProvider::remove(self, key)
    }
}

impl<T: DocumentProvider + Send + Sync> DocumentProviderDyn for T {
    fn set_page_title(&self, title: &str) {
        DocumentProvider::set_page_title(self, title)
    }
}

// =============================================================================
// Platform implementation
// =============================================================================

impl Platform {
    /// Create a new Platform with the given providers
    pub fn new<Tm, Sl, S, D>(time: Tm, sleep: Sl, storage: S, document: D) -> Self
    where
        Tm: TimeProvider + Send + Sync,
        Sl: SleepProvider + Send + Sync,
        S: StorageProvider + Send + Sync,
        D: DocumentProvider + Send + Sync,
    {
        Self {
            time: Arc::new(time),
            sleep: Arc::new(sleep),
            storage: Arc::new(storage),
            document: Arc::new(document),
        }
    }

    /// Get current time as Unix timestamp in seconds
    pub fn now_unix_secs(&self) -> u64 {
        self.time.now_unix_secs()
    }

    /// Get current time in milliseconds since epoch
    pub fn now_millis(&self) -> u64 {
        self.time.now_millis()
    }

    /// Sleep for the given number of milliseconds.
    pub fn sleep_ms(&self, ms: u64) -> Pin<Box<dyn Future<Output = ()> + 'static>> {
        self.sleep.sleep_ms(ms)
    }

    pub fn storage_save(&self, key: &str, value: &str) {
        self.storage.save(key, value)
    }

    pub fn storage_load(&self, key: &str) -> Option<String> {
        self.storage.load(key)
    }

    pub fn storage_remove(&self, key: &str) {
        self.storage.remove(key)
    }

    /// Set the browser page title (no-op on desktop)
    pub fn set_page_title(&self, title: &str) {
        self.document.set_page_title(title)
    }
}

// Platform doubles as the storage and clock handed to application services
// (the session store needs both).

impl StorageProvider for Platform {
    fn save(&self, key: &str, value: &str) {
        self.storage_save(key, value)
    }

    fn load(&self, key: &str) -> Option<String> {
        self.storage_load(key)
    }

    fn remove(&self, key: &str) {
        self.storage_remove(key)
    }
}

impl TimeProvider for Platform {
    fn now_unix_secs(&self) -> u64 {
        Platform::now_unix_secs(self)
    }

    fn now_millis(&self) -> u64 {
        Platform::now_millis(self)
    }
}

#[cfg(test)]
mod tests {
    use crate::infrastructure::platform::mock::create_mock_platform;

    #[test]
    fn storage_round_trips_through_container() {
        let platform = create_mock_platform(1_000);
        platform.storage_save("k", "v");
        assert_eq!(platform.storage_load("k").as_deref(), Some("v"));
        platform.storage_remove("k");
        assert_eq!(platform.storage_load("k"), None);
    }

    #[test]
    fn clock_is_delegated() {
        let platform = create_mock_platform(1_000);
        assert_eq!(platform.now_unix_secs(), 1_000);
        assert_eq!(platform.now_millis(), 1_000_000);
    }
}
