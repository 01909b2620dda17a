//! WebSocket Bridge - connects CommandBus/EventBus to the ChannelClient.
//!
//! `create_channel` sets up:
//! - A CommandBus for sending events
//! - An EventBus for receiving events
//! - A background task that bridges these to the WebSocket transport
//!
//! Platform-specific implementations handle the differences between
//! desktop (tokio) and WASM (wasm-bindgen-futures) async runtimes.

use std::sync::atomic::AtomicU8;
use std::sync::Arc;

use quizdash_shared::Namespace;

use super::shared::ReconnectPolicy;
use super::ChannelClient;
use crate::infrastructure::channel::Channel;
use crate::infrastructure::messaging::{
    set_connection_state, BusMessage, CommandBus, ConnectionHandle, ConnectionState, EventBus,
};

#[cfg(not(target_arch = "wasm32"))]
use tokio::sync::{mpsc, oneshot};

#[cfg(target_arch = "wasm32")]
use futures_channel::{mpsc, oneshot};

// =============================================================================
// Desktop Implementation (tokio)
// =============================================================================

/// Open a push channel to `endpoint` on `namespace`.
///
/// The channel starts out `Connecting`; the transport is driven by a
/// background task until the channel is closed or every handle is dropped.
#[cfg(not(target_arch = "wasm32"))]
pub fn create_channel(endpoint: &str, namespace: Namespace, policy: ReconnectPolicy) -> Channel {
    let (cmd_tx, cmd_rx) = mpsc::channel::<BusMessage>(32);
    let (disconnect_tx, disconnect_rx) = oneshot::channel::<()>();
    let state = Arc::new(AtomicU8::new(ConnectionState::Connecting.to_u8()));

    let command_bus = CommandBus::new(cmd_tx);
    let event_bus = EventBus::new();

    let client = ChannelClient::new(endpoint, namespace.clone(), policy);
    let event_bus_for_bridge = event_bus.clone();
    let state_for_bridge = Arc::clone(&state);

    tokio::spawn(async move {
        desktop_bridge_task(
            client,
            cmd_rx,
            disconnect_rx,
            event_bus_for_bridge,
            state_for_bridge,
        )
        .await;
    });

    let handle = ConnectionHandle::new(state, disconnect_tx);
    Channel::new(namespace, command_bus, event_bus, handle)
}

#[cfg(not(target_arch = "wasm32"))]
async fn desktop_bridge_task(
    client: ChannelClient,
    mut cmd_rx: mpsc::Receiver<BusMessage>,
    mut disconnect_rx: oneshot::Receiver<()>,
    event_bus: EventBus,
    state: Arc<AtomicU8>,
) {
    let state_for_callback = Arc::clone(&state);
    client
        .set_on_state_change(move |conn_state| {
            set_connection_state(&state_for_callback, conn_state);
        })
        .await;

    // Dispatched inline so handlers observe events in arrival order.
    client
        .set_on_event(move |name, args| {
            event_bus.dispatch(&name, &args);
        })
        .await;

    let runner = client.clone();
    let mut connection = tokio::spawn(async move { runner.run().await });

    loop {
        tokio::select! {
            // Explicit close, or every handle dropped
            _ = &mut disconnect_rx => {
                tracing::info!("Disconnect requested");
                client.disconnect().await;
                let _ = connection.await;
                set_connection_state(&state, ConnectionState::Disconnected);
                break;
            }

            // Transport gave up on its own (refused or out of retries)
            _ = &mut connection => {
                tracing::debug!("Push transport task finished");
                break;
            }

            Some(bus_msg) = cmd_rx.recv() => {
                match bus_msg {
                    BusMessage::Emit { event, payload } => {
                        if let Err(e) = client.emit(&event, payload).await {
                            tracing::error!(event = %event, "Failed to send push event: {}", e);
                        }
                    }
                }
            }
        }
    }
}

// =============================================================================
// WASM Implementation
// =============================================================================

#[cfg(target_arch = "wasm32")]
pub fn create_channel(endpoint: &str, namespace: Namespace, policy: ReconnectPolicy) -> Channel {
    use wasm_bindgen_futures::spawn_local;

    let (cmd_tx, cmd_rx) = mpsc::unbounded::<BusMessage>();
    let (disconnect_tx, disconnect_rx) = oneshot::channel::<()>();
    let state = Arc::new(AtomicU8::new(ConnectionState::Connecting.to_u8()));

    let command_bus = CommandBus::new(cmd_tx);
    let event_bus = EventBus::new();

    let client = ChannelClient::new(endpoint, namespace.clone(), policy);
    let event_bus_for_bridge = event_bus.clone();
    let state_for_bridge = Arc::clone(&state);

    spawn_local(async move {
        wasm_bridge_task(
            client,
            cmd_rx,
            disconnect_rx,
            event_bus_for_bridge,
            state_for_bridge,
        )
        .await;
    });

    let handle = ConnectionHandle::new(state, disconnect_tx);
    Channel::new(namespace, command_bus, event_bus, handle)
}

#[cfg(target_arch = "wasm32")]
async fn wasm_bridge_task(
    client: ChannelClient,
    mut cmd_rx: mpsc::UnboundedReceiver<BusMessage>,
    disconnect_rx: oneshot::Receiver<()>,
    event_bus: EventBus,
    state: Arc<AtomicU8>,
) {
    use futures_util::future::{select, Either};
    use futures_util::StreamExt;

    let state_for_callback = Arc::clone(&state);
    client.set_on_state_change(move |conn_state| {
        set_connection_state(&state_for_callback, conn_state);
    });

    client.set_on_event(move |name, args| {
        event_bus.dispatch(&name, &args);
    });

    if let Err(e) = client.connect() {
        tracing::error!("Failed to open push channel: {}", e);
        set_connection_state(&state, ConnectionState::Failed);
        return;
    }

    let mut disconnect_rx = disconnect_rx;
    loop {
        let cmd_future = cmd_rx.next();
        let disconnect_future = &mut disconnect_rx;

        match select(cmd_future, disconnect_future).await {
            Either::Left((Some(BusMessage::Emit { event, payload }), _)) => {
                client.emit(&event, payload);
            }
            Either::Left((None, _)) | Either::Right((_, _)) => {
                tracing::info!("Disconnect requested");
                client.disconnect();
                set_connection_state(&state, ConnectionState::Disconnected);
                break;
            }
        }
    }
}
