//! Push channel fixtures that need no network.

use std::sync::atomic::AtomicU8;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::{mpsc, oneshot};

use quizdash_shared::Namespace;

use crate::infrastructure::channel::Channel;
use crate::infrastructure::channel_manager::ChannelConnector;
use crate::infrastructure::messaging::{
    BusMessage, CommandBus, ConnectionHandle, ConnectionState, EventBus,
};

/// A channel with the bridge side exposed to the test
pub struct DetachedChannel {
    pub channel: Channel,
    /// Events the channel emitted
    pub commands: mpsc::Receiver<BusMessage>,
    /// Feed inbound events through this bus
    pub events: EventBus,
    /// Transport state, starts `Connecting`
    pub state: Arc<AtomicU8>,
    pub disconnect: oneshot::Receiver<()>,
}

pub fn detached_channel(namespace: Namespace) -> DetachedChannel {
    let (cmd_tx, commands) = mpsc::channel(32);
    let (disconnect_tx, disconnect) = oneshot::channel();
    let state = Arc::new(AtomicU8::new(ConnectionState::Connecting.to_u8()));
    let events = EventBus::new();

    let channel = Channel::new(
        namespace,
        CommandBus::new(cmd_tx),
        events.clone(),
        ConnectionHandle::new(Arc::clone(&state), disconnect_tx),
    );

    DetachedChannel {
        channel,
        commands,
        events,
        state,
        disconnect,
    }
}

/// Connector that hands out detached channels and keeps their bridge side
#[derive(Default)]
pub struct RecordingConnector {
    opened: Mutex<Vec<DetachedChannel>>,
}

impl RecordingConnector {
    /// Bridge sides of every channel opened so far, oldest first
    pub fn opened(&self) -> MutexGuard<'_, Vec<DetachedChannel>> {
        self.opened.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn open_count(&self) -> usize {
        self.opened().len()
    }

    /// Transport state of the most recently opened channel
    pub fn last_state(&self) -> Option<Arc<AtomicU8>> {
        self.opened().last().map(|d| Arc::clone(&d.state))
    }
}

impl ChannelConnector for RecordingConnector {
    fn open(&self, namespace: &Namespace) -> Channel {
        let detached = detached_channel(namespace.clone());
        let channel = detached.channel.clone();
        self.opened().push(detached);
        channel
    }
}
