//! Process-wide owner of push channels.
//!
//! Views ask the manager for a namespace channel instead of opening their
//! own, so remounting a view reuses the transport that is already up.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use quizdash_shared::Namespace;

use crate::infrastructure::channel::Channel;
use crate::infrastructure::websocket::{create_channel, ReconnectPolicy};

/// Opens new channels; the seam tests replace.
pub trait ChannelConnector: Send + Sync {
    fn open(&self, namespace: &Namespace) -> Channel;
}

/// Production connector: one Socket.IO WebSocket per namespace
pub struct WebSocketConnector {
    endpoint: String,
    policy: ReconnectPolicy,
}

impl WebSocketConnector {
    pub fn new(endpoint: impl Into<String>, policy: ReconnectPolicy) -> Self {
        Self {
            endpoint: endpoint.into(),
            policy,
        }
    }
}

impl ChannelConnector for WebSocketConnector {
    fn open(&self, namespace: &Namespace) -> Channel {
        tracing::info!(endpoint = %self.endpoint, %namespace, "Opening push channel");
        create_channel(&self.endpoint, namespace.clone(), self.policy)
    }
}

pub struct ChannelManager {
    connector: Arc<dyn ChannelConnector>,
    channels: Mutex<HashMap<Namespace, Channel>>,
}

impl ChannelManager {
    pub fn new(connector: Arc<dyn ChannelConnector>) -> Self {
        Self {
            connector,
            channels: Mutex::new(HashMap::new()),
        }
    }

    fn channels(&self) -> MutexGuard<'_, HashMap<Namespace, Channel>> {
        self.channels.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Channel for `namespace`, opening one only when none is live.
    ///
    /// A channel that is connecting, connected or retrying is returned as-is;
    /// a failed or closed one is replaced.
    pub fn connect(&self, namespace: &Namespace) -> Channel {
        let mut channels = self.channels();

        if let Some(existing) = channels.get(namespace) {
            if existing.is_live() {
                return existing.clone();
            }
            tracing::info!(%namespace, state = %existing.state(), "Replacing dead push channel");
            existing.close();
        }

        let channel = self.connector.open(namespace);
        channels.insert(namespace.clone(), channel.clone());
        channel
    }

    /// Channel on the default namespace
    pub fn connect_root(&self) -> Channel {
        self.connect(&Namespace::root())
    }

    /// Channel on `/dashboard`
    pub fn connect_dashboard(&self) -> Channel {
        self.connect(&Namespace::dashboard())
    }

    /// Current channel for `namespace`, without connecting
    pub fn get(&self, namespace: &Namespace) -> Option<Channel> {
        self.channels().get(namespace).cloned()
    }

    /// Close and forget the channel for `namespace`. Returns whether one existed.
    pub fn release(&self, namespace: &Namespace) -> bool {
        let removed = self.channels().remove(namespace);
        match removed {
            Some(channel) => {
                channel.close();
                true
            }
            None => false,
        }
    }

    pub fn release_dashboard(&self) -> bool {
        self.release(&Namespace::dashboard())
    }

    /// Close every channel (application shutdown)
    pub fn close_all(&self) {
        let drained: Vec<Channel> = self.channels().drain().map(|(_, c)| c).collect();
        for channel in drained {
            channel.close();
        }
    }
}
