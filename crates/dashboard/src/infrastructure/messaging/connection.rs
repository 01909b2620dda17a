//! Connection lifecycle management.
//!
//! This module provides types for managing the push channel lifecycle,
//! including connection state observation and disconnect control.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

#[cfg(not(target_arch = "wasm32"))]
use tokio::sync::oneshot;

#[cfg(target_arch = "wasm32")]
use futures_channel::oneshot;

/// Lifecycle of a push channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// Not connected to the server
    #[default]
    Disconnected,
    /// Attempting to establish connection
    Connecting,
    /// Namespace joined; events flow both ways
    Connected,
    /// Connection lost, attempting to reconnect
    Reconnecting,
    /// Reconnect attempts exhausted or the server refused the namespace
    Failed,
}

impl ConnectionState {
    /// Convert to u8 for atomic storage.
    pub fn to_u8(self) -> u8 {
        match self {
            ConnectionState::Disconnected => 0,
            ConnectionState::Connecting => 1,
            ConnectionState::Connected => 2,
            ConnectionState::Reconnecting => 3,
            ConnectionState::Failed => 4,
        }
    }

    /// Convert from u8 (atomic storage).
    pub fn from_u8(v: u8) -> Self {
        match v {
            1 => ConnectionState::Connecting,
            2 => ConnectionState::Connected,
            3 => ConnectionState::Reconnecting,
            4 => ConnectionState::Failed,
            _ => ConnectionState::Disconnected,
        }
    }

    /// Whether a channel in this state is still usable (or about to be).
    ///
    /// A live channel is reused instead of opening a second transport.
    pub fn is_live(self) -> bool {
        matches!(
            self,
            ConnectionState::Connecting | ConnectionState::Connected | ConnectionState::Reconnecting
        )
    }

    /// Short label for the status indicator
    pub fn display_text(self) -> &'static str {
        match self {
            ConnectionState::Disconnected => "Offline",
            ConnectionState::Connecting => "Connecting...",
            ConnectionState::Connected => "Live",
            ConnectionState::Reconnecting => "Reconnecting...",
            ConnectionState::Failed => "Connection lost",
        }
    }

    /// CSS modifier for the status indicator dot
    pub fn indicator_class(self) -> &'static str {
        match self {
            ConnectionState::Connected => "dot-live",
            ConnectionState::Connecting | ConnectionState::Reconnecting => "dot-pending",
            ConnectionState::Disconnected | ConnectionState::Failed => "dot-down",
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_text())
    }
}

/// Handle to manage connection lifecycle.
///
/// Dropping the handle drops the disconnect sender, which the bridge task
/// treats as a disconnect request.
pub struct ConnectionHandle {
    /// Shared state for reading current connection state
    state: Arc<AtomicU8>,
    /// Channel to request disconnect (consumed on disconnect)
    disconnect_tx: Option<oneshot::Sender<()>>,
}

impl ConnectionHandle {
    /// Create a new ConnectionHandle.
    ///
    /// Called by the bridge when spawning the connection task.
    pub fn new(state: Arc<AtomicU8>, disconnect_tx: oneshot::Sender<()>) -> Self {
        Self {
            state,
            disconnect_tx: Some(disconnect_tx),
        }
    }

    /// Get the current connection state.
    pub fn state(&self) -> ConnectionState {
        ConnectionState::from_u8(self.state.load(Ordering::SeqCst))
    }

    /// Request disconnect.
    ///
    /// This sends a signal to the bridge task to close the connection.
    /// The connection may not close immediately - check `state()` to verify.
    pub fn disconnect(mut self) {
        if let Some(tx) = self.disconnect_tx.take() {
            let _ = tx.send(());
        }
    }

    /// Get a clone of the state Arc for sharing with observers.
    pub fn state_arc(&self) -> Arc<AtomicU8> {
        Arc::clone(&self.state)
    }
}

/// Observable connection state for UI binding.
///
/// Outlives the handle: observers keep reporting the last state after close.
#[derive(Clone)]
pub struct ConnectionStateObserver {
    state: Arc<AtomicU8>,
}

impl ConnectionStateObserver {
    /// Create a new observer from a ConnectionHandle.
    pub fn from_handle(handle: &ConnectionHandle) -> Self {
        Self {
            state: handle.state_arc(),
        }
    }

    /// Create a new observer from a shared state Arc.
    pub fn new(state: Arc<AtomicU8>) -> Self {
        Self { state }
    }

    /// Get the current connection state.
    pub fn state(&self) -> ConnectionState {
        ConnectionState::from_u8(self.state.load(Ordering::SeqCst))
    }

    /// Check if currently connected.
    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }
}

/// Internal helper to update connection state (used by bridge).
pub fn set_connection_state(state_ref: &AtomicU8, new_state: ConnectionState) {
    state_ref.store(new_state.to_u8(), Ordering::SeqCst);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_state_roundtrip() {
        let states = [
            ConnectionState::Disconnected,
            ConnectionState::Connecting,
            ConnectionState::Connected,
            ConnectionState::Reconnecting,
            ConnectionState::Failed,
        ];

        for state in states {
            assert_eq!(ConnectionState::from_u8(state.to_u8()), state);
        }
    }

    #[test]
    fn test_live_states() {
        assert!(ConnectionState::Connecting.is_live());
        assert!(ConnectionState::Connected.is_live());
        assert!(ConnectionState::Reconnecting.is_live());
        assert!(!ConnectionState::Disconnected.is_live());
        assert!(!ConnectionState::Failed.is_live());
    }

    #[test]
    fn test_observer_reads_state() {
        let state = Arc::new(AtomicU8::new(ConnectionState::Disconnected.to_u8()));
        let observer = ConnectionStateObserver::new(Arc::clone(&state));

        assert_eq!(observer.state(), ConnectionState::Disconnected);
        assert!(!observer.is_connected());

        set_connection_state(&state, ConnectionState::Connected);

        assert_eq!(observer.state(), ConnectionState::Connected);
        assert!(observer.is_connected());
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_disconnect_signals_bridge() {
        let state = Arc::new(AtomicU8::new(ConnectionState::Connected.to_u8()));
        let (tx, mut rx) = oneshot::channel();
        let handle = ConnectionHandle::new(state, tx);

        handle.disconnect();
        assert!(rx.try_recv().is_ok());
    }
}
