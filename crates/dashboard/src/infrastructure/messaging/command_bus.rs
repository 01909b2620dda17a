//! Command Bus for sending events to the server.
//!
//! The CommandBus queues outbound events for the bridge task, which hands
//! them to the transport (buffered there until the namespace is joined).

use serde_json::Value;
use thiserror::Error;

#[cfg(not(target_arch = "wasm32"))]
use tokio::sync::mpsc;

#[cfg(target_arch = "wasm32")]
use futures_channel::mpsc;

/// Messages sent through the command bus to the WebSocket bridge.
#[derive(Debug, Clone, PartialEq)]
pub enum BusMessage {
    /// Fire-and-forget event on the channel's namespace
    Emit {
        event: String,
        payload: Option<Value>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelError {
    /// The bridge task is gone; the channel was closed
    #[error("push channel is closed")]
    Closed,
    /// The outbound queue is full
    #[error("push channel is busy, event dropped: {0}")]
    Busy(String),
}

/// Command bus for sending events to the server.
///
/// This is a concrete struct (not a trait) that can be cloned and shared.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Clone)]
pub struct CommandBus {
    tx: mpsc::Sender<BusMessage>,
}

#[cfg(target_arch = "wasm32")]
#[derive(Clone)]
pub struct CommandBus {
    tx: mpsc::UnboundedSender<BusMessage>,
}

#[cfg(not(target_arch = "wasm32"))]
impl CommandBus {
    pub fn new(tx: mpsc::Sender<BusMessage>) -> Self {
        Self { tx }
    }

    /// Queue an event without waiting.
    pub fn emit(&self, event: &str, payload: Option<Value>) -> Result<(), ChannelError> {
        self.tx
            .try_send(BusMessage::Emit {
                event: event.to_string(),
                payload,
            })
            .map_err(|e| match e {
                mpsc::error::TrySendError::Full(_) => ChannelError::Busy(event.to_string()),
                mpsc::error::TrySendError::Closed(_) => ChannelError::Closed,
            })
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

#[cfg(target_arch = "wasm32")]
impl CommandBus {
    pub fn new(tx: mpsc::UnboundedSender<BusMessage>) -> Self {
        Self { tx }
    }

    /// Queue an event without waiting.
    pub fn emit(&self, event: &str, payload: Option<Value>) -> Result<(), ChannelError> {
        self.tx
            .unbounded_send(BusMessage::Emit {
                event: event.to_string(),
                payload,
            })
            .map_err(|_| ChannelError::Closed)
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}
