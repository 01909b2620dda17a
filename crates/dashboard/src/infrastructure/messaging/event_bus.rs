//! Event Bus for receiving named events from a push channel.
//!
//! Handlers subscribe to one event name and are invoked, in registration
//! order, with the event's arguments. Each subscription returns a
//! `HandlerId` used to remove exactly that handler later.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::Value;

/// Callback invoked with the arguments of one event
pub type EventHandler = Arc<dyn Fn(&[Value]) + Send + Sync + 'static>;

/// Identifies one registered handler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "handler-{}", self.0)
    }
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    handlers: Vec<(String, HandlerId, EventHandler)>,
}

/// Named-event handler registry.
///
/// Cloning shares the registry. The lock is released before handlers run, so
/// a handler may subscribe or unsubscribe without deadlocking.
#[derive(Clone, Default)]
pub struct EventBus {
    registry: Arc<Mutex<Registry>>,
}

impl EventBus {
    /// Create a new EventBus with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Registry> {
        // A panicking handler never runs under the lock; recover the registry.
        self.registry.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Register `handler` for `event`.
    pub fn subscribe(
        &self,
        event: &str,
        handler: impl Fn(&[Value]) + Send + Sync + 'static,
    ) -> HandlerId {
        let mut registry = self.lock();
        registry.next_id += 1;
        let id = HandlerId(registry.next_id);
        registry
            .handlers
            .push((event.to_string(), id, Arc::new(handler)));
        id
    }

    /// Remove one handler. Returns false when it was not registered for `event`.
    pub fn unsubscribe(&self, event: &str, id: HandlerId) -> bool {
        let mut registry = self.lock();
        let before = registry.handlers.len();
        registry
            .handlers
            .retain(|(name, handler_id, _)| !(name == event && *handler_id == id));
        registry.handlers.len() != before
    }

    /// Invoke every handler registered for `event`. Returns how many ran.
    ///
    /// This is called by the WebSocket bridge when events arrive.
    pub fn dispatch(&self, event: &str, args: &[Value]) -> usize {
        let handlers: Vec<EventHandler> = self
            .lock()
            .handlers
            .iter()
            .filter(|(name, _, _)| name == event)
            .map(|(_, _, handler)| Arc::clone(handler))
            .collect();

        for handler in &handlers {
            handler(args);
        }
        handlers.len()
    }

    /// Number of handlers registered for `event`.
    pub fn subscriber_count(&self, event: &str) -> usize {
        self.lock()
            .handlers
            .iter()
            .filter(|(name, _, _)| name == event)
            .count()
    }

    /// Clear all subscribers.
    pub fn clear(&self) {
        self.lock().handlers.clear();
    }
}
