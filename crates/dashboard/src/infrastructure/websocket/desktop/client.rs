//! Desktop push channel client using tokio-tungstenite

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::sync::{mpsc, Mutex, Notify, RwLock};
use tokio_tungstenite::{connect_async, tungstenite::Message};

use quizdash_shared::{EnginePacket, Namespace, SocketPacket};

use crate::infrastructure::messaging::ConnectionState;
use crate::infrastructure::websocket::core::{Outbox, ReconnectState, SessionEnd};
use crate::infrastructure::websocket::shared::{interpret_frame, FrameAction, ReconnectPolicy};

type EventCallback = Box<dyn Fn(String, Vec<Value>) + Send + Sync>;
type StateCallback = Box<dyn Fn(ConnectionState) + Send + Sync>;

/// Socket.IO client bound to one namespace (Desktop)
pub struct ChannelClient {
    url: String,
    namespace: Namespace,
    policy: ReconnectPolicy,
    state: Arc<RwLock<ConnectionState>>,
    tx: Arc<Mutex<Option<mpsc::Sender<String>>>>,
    outbox: Arc<Mutex<Outbox>>,
    on_event: Arc<Mutex<Option<EventCallback>>>,
    on_state_change: Arc<Mutex<Option<StateCallback>>>,
    /// Flag to track if disconnect was intentional (vs unexpected close)
    intentional_disconnect: Arc<RwLock<bool>>,
    shutdown: Arc<Notify>,
}

impl ChannelClient {
    pub fn new(url: impl Into<String>, namespace: Namespace, policy: ReconnectPolicy) -> Self {
        Self {
            url: url.into(),
            namespace,
            policy,
            state: Arc::new(RwLock::new(ConnectionState::Disconnected)),
            tx: Arc::new(Mutex::new(None)),
            outbox: Arc::new(Mutex::new(Outbox::default())),
            on_event: Arc::new(Mutex::new(None)),
            on_state_change: Arc::new(Mutex::new(None)),
            intentional_disconnect: Arc::new(RwLock::new(false)),
            shutdown: Arc::new(Notify::new()),
        }
    }

    pub async fn set_on_event<F>(&self, callback: F)
    where
        F: Fn(String, Vec<Value>) + Send + Sync + 'static,
    {
        *self.on_event.lock().await = Some(Box::new(callback));
    }

    pub async fn set_on_state_change<F>(&self, callback: F)
    where
        F: Fn(ConnectionState) + Send + Sync + 'static,
    {
        *self.on_state_change.lock().await = Some(Box::new(callback));
    }

    pub async fn state(&self) -> ConnectionState {
        *self.state.read().await
    }

    async fn set_state(&self, new_state: ConnectionState) {
        *self.state.write().await = new_state;

        let callback = self.on_state_change.lock().await;
        if let Some(ref cb) = *callback {
            cb(new_state);
        }
    }

    async fn is_intentional(&self) -> bool {
        *self.intentional_disconnect.read().await
    }

    /// Run one transport session until it ends
    async fn connect_internal(&self) -> Result<SessionEnd> {
        if self.state().await != ConnectionState::Reconnecting {
            self.set_state(ConnectionState::Connecting).await;
        }

        let (ws_stream, _) = connect_async(self.url.as_str()).await?;
        tracing::info!(url = %self.url, namespace = %self.namespace, "Push transport open");

        let (mut write, mut read) = ws_stream.split();
        let (tx, mut rx) = mpsc::channel::<String>(32);
        *self.tx.lock().await = Some(tx.clone());

        // Ends once every sender is gone, after flushing what was queued.
        tokio::spawn(async move {
            while let Some(frame) = rx.recv().await {
                if let Err(e) = write.send(Message::Text(frame)).await {
                    tracing::error!("Failed to write push frame: {}", e);
                    break;
                }
            }
            let _ = write.close().await;
        });

        let mut established = false;
        let end = loop {
            let msg = tokio::select! {
                msg = read.next() => msg,
                _ = self.shutdown.notified() => break SessionEnd::Closed,
            };

            let text = match msg {
                Some(Ok(Message::Text(text))) => text,
                Some(Ok(Message::Close(_))) | None => {
                    tracing::info!("Server closed push transport");
                    break self.dropped_or_closed(established).await;
                }
                Some(Ok(_)) => continue,
                Some(Err(e)) => {
                    tracing::error!("Push transport error: {}", e);
                    break self.dropped_or_closed(established).await;
                }
            };

            match interpret_frame(&text, &self.namespace) {
                FrameAction::Reply(frame) => {
                    if tx.send(frame).await.is_err() {
                        break self.dropped_or_closed(established).await;
                    }
                }
                FrameAction::NamespaceConnected => {
                    established = true;
                    self.set_state(ConnectionState::Connected).await;
                    tracing::info!(namespace = %self.namespace, "Joined push namespace");

                    // Held across the flush so concurrent emits queue behind it.
                    let mut outbox = self.outbox.lock().await;
                    for frame in outbox.open() {
                        let _ = tx.send(frame).await;
                    }
                }
                FrameAction::Event { name, args } => {
                    let callback = self.on_event.lock().await;
                    if let Some(ref cb) = *callback {
                        cb(name, args);
                    }
                }
                FrameAction::ConnectRejected(reason) => {
                    tracing::warn!(namespace = %self.namespace, %reason, "Server refused push namespace");
                    break SessionEnd::Rejected;
                }
                FrameAction::ServerDisconnect => {
                    tracing::info!(namespace = %self.namespace, "Server closed push namespace");
                    break SessionEnd::Closed;
                }
                FrameAction::TransportClose => {
                    break self.dropped_or_closed(established).await;
                }
                FrameAction::Ignore => {}
            }
        };

        self.outbox.lock().await.close();
        *self.tx.lock().await = None;
        Ok(end)
    }

    async fn dropped_or_closed(&self, established: bool) -> SessionEnd {
        if self.is_intentional().await {
            SessionEnd::Closed
        } else {
            SessionEnd::Dropped { established }
        }
    }

    /// Connect and keep the channel up until closed, refused or out of retries.
    pub async fn run(&self) {
        *self.intentional_disconnect.write().await = false;
        let mut reconnect = ReconnectState::new(self.policy);

        loop {
            match self.connect_internal().await {
                Ok(SessionEnd::Closed) => {
                    self.set_state(ConnectionState::Disconnected).await;
                    return;
                }
                Ok(SessionEnd::Rejected) => {
                    self.set_state(ConnectionState::Failed).await;
                    return;
                }
                Ok(SessionEnd::Dropped { established }) => {
                    if established {
                        reconnect.reset();
                    }
                }
                Err(e) => {
                    tracing::warn!(attempt = reconnect.attempts(), "Push connection failed: {}", e);
                }
            }

            if self.is_intentional().await {
                self.set_state(ConnectionState::Disconnected).await;
                return;
            }

            self.set_state(ConnectionState::Reconnecting).await;
            let Some(delay) = reconnect.next_delay_and_advance() else {
                tracing::error!("Max reconnection attempts reached, giving up");
                self.set_state(ConnectionState::Failed).await;
                return;
            };
            tracing::info!(
                "Reconnection attempt {} of {}, waiting {}ms",
                reconnect.attempts(),
                reconnect.max_attempts(),
                delay
            );

            tokio::time::sleep(Duration::from_millis(delay)).await;

            if self.is_intentional().await {
                tracing::info!("Reconnection cancelled - intentional disconnect");
                self.set_state(ConnectionState::Disconnected).await;
                return;
            }
        }
    }

    /// Send an event, buffering it until the namespace is joined
    pub async fn emit(&self, event: &str, payload: Option<Value>) -> Result<()> {
        let frame =
            EnginePacket::Message(SocketPacket::event(&self.namespace, event, payload)).encode();

        let mut outbox = self.outbox.lock().await;
        let Some(frame) = outbox.queue_or_pass(frame) else {
            tracing::debug!(event, queued = outbox.len(), "Push event buffered until connected");
            return Ok(());
        };

        let tx = self.tx.lock().await.clone();
        match tx {
            Some(tx) => {
                tx.send(frame).await?;
                Ok(())
            }
            None => Err(anyhow::anyhow!("Not connected")),
        }
    }

    pub async fn disconnect(&self) {
        // Mark this as intentional to prevent reconnection attempts
        *self.intentional_disconnect.write().await = true;

        let tx = self.tx.lock().await.take();
        if let Some(tx) = tx {
            let leave = EnginePacket::Message(SocketPacket::disconnect(&self.namespace)).encode();
            let _ = tx.send(leave).await;
        }
        self.shutdown.notify_one();
    }
}

impl Clone for ChannelClient {
    fn clone(&self) -> Self {
        Self {
            url: self.url.clone(),
            namespace: self.namespace.clone(),
            policy: self.policy,
            state: Arc::clone(&self.state),
            tx: Arc::clone(&self.tx),
            outbox: Arc::clone(&self.outbox),
            on_event: Arc::clone(&self.on_event),
            on_state_change: Arc::clone(&self.on_state_change),
            intentional_disconnect: Arc::clone(&self.intentional_disconnect),
            shutdown: Arc::clone(&self.shutdown),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;

    #[tokio::test]
    async fn emits_before_join_are_buffered() {
        let client = ChannelClient::new(
            "ws://127.0.0.1:9/socket.io/?EIO=4&transport=websocket",
            Namespace::dashboard(),
            ReconnectPolicy::default(),
        );

        client.emit("dashboard-join", None).await.unwrap();

        let mut outbox = client.outbox.lock().await;
        assert_eq!(outbox.open(), vec![r#"42/dashboard,["dashboard-join"]"#.to_string()]);
    }

    #[tokio::test]
    async fn unreachable_server_fails_after_retries() {
        let client = ChannelClient::new(
            "ws://127.0.0.1:9/socket.io/?EIO=4&transport=websocket",
            Namespace::dashboard(),
            ReconnectPolicy {
                max_attempts: 2,
                delay_ms: 1,
            },
        );
        let seen = Arc::new(StdMutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);
        client
            .set_on_state_change(move |state| seen_clone.lock().unwrap().push(state))
            .await;

        client.run().await;

        assert_eq!(client.state().await, ConnectionState::Failed);
        let seen = seen.lock().unwrap();
        assert_eq!(seen.first(), Some(&ConnectionState::Connecting));
        assert_eq!(
            seen.iter()
                .filter(|s| **s == ConnectionState::Reconnecting)
                .count(),
            3
        );
    }
}
