//! Mock platform for tests
//!
//! In-memory storage and a settable clock; sleeps complete immediately.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::{future::Future, pin::Pin};

use crate::ports::outbound::platform::{
    DocumentProvider, SleepProvider, StorageProvider, TimeProvider,
};
use crate::state::Platform;

/// In-memory storage shared between clones
#[derive(Clone, Default)]
pub struct MockStorageProvider {
    data: Arc<Mutex<HashMap<String, String>>>,
}

impl MockStorageProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.load(key).is_some()
    }
}

impl StorageProvider for MockStorageProvider {
    fn save(&self, key: &str, value: &str) {
        if let Ok(mut data) = self.data.lock() {
            data.insert(key.to_string(), value.to_string());
        }
    }

    fn load(&self, key: &str) -> Option<String> {
        self.data.lock().ok()?.get(key).cloned()
    }

    fn remove(&self, key: &str) {
        if let Ok(mut data) = self.data.lock() {
            data.remove(key);
        }
    }
}

/// Clock that only moves when told to
#[derive(Clone, Default)]
pub struct MockTimeProvider {
    now_secs: Arc<AtomicU64>,
}

impl MockTimeProvider {
    pub fn at(now_secs: u64) -> Self {
        Self {
            now_secs: Arc::new(AtomicU64::new(now_secs)),
        }
    }

    pub fn advance(&self, secs: u64) {
        self.now_secs.fetch_add(secs, Ordering::SeqCst);
    }
}

impl TimeProvider for MockTimeProvider {
    fn now_unix_secs(&self) -> u64 {
        self.now_secs.load(Ordering::SeqCst)
    }

    fn now_millis(&self) -> u64 {
        self.now_unix_secs() * 1000
    }
}

#[derive(Clone, Default)]
pub struct MockSleepProvider;

impl SleepProvider for MockSleepProvider {
    fn sleep_ms(&self, _ms: u64) -> Pin<Box<dyn Future<Output = ()> + 'static>> {
        Box::pin(std::future::ready(()))
    }
}

#[derive(Clone, Default)]
pub struct MockDocumentProvider;

impl DocumentProvider for MockDocumentProvider {
    fn set_page_title(&self, _title: &str) {}
}

/// Platform with fresh in-memory storage and a clock fixed at `now_secs`
pub fn create_mock_platform(now_secs: u64) -> Platform {
    Platform::new(
        MockTimeProvider::at(now_secs),
        MockSleepProvider,
        MockStorageProvider::new(),
        MockDocumentProvider,
    )
}
