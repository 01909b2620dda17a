//! Push channel handle handed to the UI.

use std::sync::{Arc, Mutex};

use serde_json::Value;

use quizdash_shared::Namespace;

use crate::infrastructure::messaging::{
    ChannelError, CommandBus, ConnectionHandle, ConnectionState, ConnectionStateObserver,
    EventBus, HandlerId,
};

/// Cloneable handle to one namespace connection.
///
/// All clones share the transport. `close` tears it down for every clone;
/// dropping the last clone has the same effect.
#[derive(Clone)]
pub struct Channel {
    inner: Arc<ChannelInner>,
}

struct ChannelInner {
    namespace: Namespace,
    commands: CommandBus,
    events: EventBus,
    observer: ConnectionStateObserver,
    handle: Mutex<Option<ConnectionHandle>>,
}

impl Channel {
    pub fn new(
        namespace: Namespace,
        commands: CommandBus,
        events: EventBus,
        handle: ConnectionHandle,
    ) -> Self {
        let observer = ConnectionStateObserver::from_handle(&handle);
        Self {
            inner: Arc::new(ChannelInner {
                namespace,
                commands,
                events,
                observer,
                handle: Mutex::new(Some(handle)),
            }),
        }
    }

    pub fn namespace(&self) -> &Namespace {
        &self.inner.namespace
    }

    /// Register `handler` for `event`; events are delivered in arrival order.
    pub fn on<F>(&self, event: &str, handler: F) -> HandlerId
    where
        F: Fn(&[Value]) + Send + Sync + 'static,
    {
        self.inner.events.subscribe(event, handler)
    }

    /// Remove exactly the handler registered as `id`.
    pub fn off(&self, event: &str, id: HandlerId) -> bool {
        self.inner.events.unsubscribe(event, id)
    }

    /// Send an event. Emits made before the namespace is joined are
    /// delivered once it is.
    pub fn emit(&self, event: &str, payload: Option<Value>) -> Result<(), ChannelError> {
        if self.is_closed() {
            return Err(ChannelError::Closed);
        }
        self.inner.commands.emit(event, payload)
    }

    pub fn state(&self) -> ConnectionState {
        self.inner.observer.state()
    }

    /// Connecting, connected or retrying
    pub fn is_live(&self) -> bool {
        !self.is_closed() && self.state().is_live()
    }

    pub fn is_closed(&self) -> bool {
        self.inner
            .handle
            .lock()
            .map(|handle| handle.is_none())
            .unwrap_or(true)
    }

    /// Close the transport for every clone of this handle.
    pub fn close(&self) {
        let handle = match self.inner.handle.lock() {
            Ok(mut guard) => guard.take(),
            Err(e) => e.into_inner().take(),
        };
        if let Some(handle) = handle {
            tracing::info!(namespace = %self.inner.namespace, "Closing push channel");
            handle.disconnect();
        }
        self.inner.events.clear();
    }

    /// Whether both handles share one transport
    pub fn same_channel(&self, other: &Channel) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use crate::infrastructure::messaging::{set_connection_state, BusMessage};
    use crate::infrastructure::testing::fixtures::detached_channel;
    use serde_json::json;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn emit_reaches_the_bridge() {
        let mut detached = detached_channel(Namespace::dashboard());

        detached.channel.emit("dashboard-join", None).unwrap();

        assert_eq!(
            detached.commands.recv().await,
            Some(BusMessage::Emit {
                event: "dashboard-join".into(),
                payload: None
            })
        );
    }

    #[test]
    fn handlers_receive_dispatched_events_until_removed() {
        let detached = detached_channel(Namespace::dashboard());
        let count = Arc::new(AtomicU32::new(0));

        let count_clone = Arc::clone(&count);
        let id = detached.channel.on("dashboard-update", move |args| {
            assert_eq!(args, [json!({"rooms": []})]);
            count_clone.fetch_add(1, Ordering::SeqCst);
        });

        detached.events.dispatch("dashboard-update", &[json!({"rooms": []})]);
        assert!(detached.channel.off("dashboard-update", id));
        detached.events.dispatch("dashboard-update", &[json!({"rooms": []})]);

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn close_signals_disconnect_and_rejects_emits() {
        let mut detached = detached_channel(Namespace::dashboard());
        let clone = detached.channel.clone();

        assert!(clone.is_live());
        detached.channel.close();

        assert!(detached.disconnect.try_recv().is_ok());
        assert!(!clone.is_live());
        assert_eq!(clone.emit("x", None), Err(ChannelError::Closed));
    }

    #[test]
    fn state_follows_transport() {
        let detached = detached_channel(Namespace::root());
        assert_eq!(detached.channel.state(), ConnectionState::Connecting);

        set_connection_state(&detached.state, ConnectionState::Failed);
        assert_eq!(detached.channel.state(), ConnectionState::Failed);
        assert!(!detached.channel.is_live());
    }
}
