//! WASM push channel client using web-sys

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use anyhow::Result;
use gloo_timers::future::TimeoutFuture;
use serde_json::Value;
use wasm_bindgen::prelude::*;
use web_sys::{MessageEvent, WebSocket};

use quizdash_shared::{EnginePacket, Namespace, SocketPacket};

use crate::infrastructure::messaging::ConnectionState;
use crate::infrastructure::websocket::core::{Outbox, ReconnectState, SessionEnd};
use crate::infrastructure::websocket::shared::{interpret_frame, FrameAction, ReconnectPolicy};

/// Storage for WebSocket event closures to prevent leaks on reconnect
struct WasmClosures {
    #[allow(dead_code)]
    onmessage: Closure<dyn FnMut(MessageEvent)>,
    #[allow(dead_code)]
    onclose: Closure<dyn FnMut()>,
    #[allow(dead_code)]
    onerror: Closure<dyn FnMut()>,
}

/// Socket.IO client bound to one namespace (WASM)
pub struct ChannelClient {
    url: String,
    namespace: Namespace,
    state: Rc<RefCell<ConnectionState>>,
    ws: Rc<RefCell<Option<WebSocket>>>,
    outbox: Rc<RefCell<Outbox>>,
    reconnect: Rc<RefCell<ReconnectState>>,
    /// Set once the session must not be retried
    session_end: Rc<Cell<Option<SessionEnd>>>,
    intentional_disconnect: Rc<Cell<bool>>,
    on_event: Rc<RefCell<Option<Box<dyn FnMut(String, Vec<Value>)>>>>,
    on_state_change: Rc<RefCell<Option<Box<dyn FnMut(ConnectionState)>>>>,
    /// Stored closures for cleanup on disconnect/reconnect
    closures: Rc<RefCell<Option<WasmClosures>>>,
}

impl ChannelClient {
    pub fn new(url: impl Into<String>, namespace: Namespace, policy: ReconnectPolicy) -> Self {
        Self {
            url: url.into(),
            namespace,
            state: Rc::new(RefCell::new(ConnectionState::Disconnected)),
            ws: Rc::new(RefCell::new(None)),
            outbox: Rc::new(RefCell::new(Outbox::default())),
            reconnect: Rc::new(RefCell::new(ReconnectState::new(policy))),
            session_end: Rc::new(Cell::new(None)),
            intentional_disconnect: Rc::new(Cell::new(false)),
            on_event: Rc::new(RefCell::new(None)),
            on_state_change: Rc::new(RefCell::new(None)),
            closures: Rc::new(RefCell::new(None)),
        }
    }

    pub fn set_on_event<F>(&self, callback: F)
    where
        F: FnMut(String, Vec<Value>) + 'static,
    {
        *self.on_event.borrow_mut() = Some(Box::new(callback));
    }

    pub fn set_on_state_change<F>(&self, callback: F)
    where
        F: FnMut(ConnectionState) + 'static,
    {
        *self.on_state_change.borrow_mut() = Some(Box::new(callback));
    }

    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    fn set_state(&self, new_state: ConnectionState) {
        *self.state.borrow_mut() = new_state;

        if let Some(ref mut cb) = *self.on_state_change.borrow_mut() {
            cb(new_state);
        }
    }

    pub fn connect(&self) -> Result<()> {
        // Drop existing closures before creating new ones to prevent leaks
        *self.closures.borrow_mut() = None;
        self.intentional_disconnect.set(false);
        self.session_end.set(None);

        if self.state() != ConnectionState::Reconnecting {
            self.set_state(ConnectionState::Connecting);
        }

        let ws = WebSocket::new(&self.url)
            .map_err(|e| anyhow::anyhow!("Failed to create WebSocket: {:?}", e))?;

        let client = self.clone();
        let onmessage_callback = Closure::<dyn FnMut(_)>::new(move |e: MessageEvent| {
            if let Ok(txt) = e.data().dyn_into::<js_sys::JsString>() {
                let text: String = txt.into();
                client.handle_frame(&text);
            }
        });
        ws.set_onmessage(Some(onmessage_callback.as_ref().unchecked_ref()));

        let client = self.clone();
        let onclose_callback = Closure::<dyn FnMut()>::new(move || {
            client.handle_close();
        });
        ws.set_onclose(Some(onclose_callback.as_ref().unchecked_ref()));

        // The browser always follows an error with a close event.
        let url = self.url.clone();
        let onerror_callback = Closure::<dyn FnMut()>::new(move || {
            tracing::warn!(%url, "Push transport error");
        });
        ws.set_onerror(Some(onerror_callback.as_ref().unchecked_ref()));

        *self.closures.borrow_mut() = Some(WasmClosures {
            onmessage: onmessage_callback,
            onclose: onclose_callback,
            onerror: onerror_callback,
        });
        *self.ws.borrow_mut() = Some(ws);

        Ok(())
    }

    fn send_raw(&self, frame: &str) {
        if let Some(ref ws) = *self.ws.borrow() {
            if let Err(e) = ws.send_with_str(frame) {
                tracing::warn!("Failed to write push frame: {:?}", e);
            }
        }
    }

    fn close_transport(&self) {
        if let Some(ref ws) = *self.ws.borrow() {
            let _ = ws.close();
        }
    }

    fn handle_frame(&self, text: &str) {
        match interpret_frame(text, &self.namespace) {
            FrameAction::Reply(frame) => self.send_raw(&frame),
            FrameAction::NamespaceConnected => {
                self.reconnect.borrow_mut().reset();
                self.set_state(ConnectionState::Connected);
                tracing::info!(namespace = %self.namespace, "Joined push namespace");

                let frames = self.outbox.borrow_mut().open();
                for frame in frames {
                    self.send_raw(&frame);
                }
            }
            FrameAction::Event { name, args } => {
                if let Some(ref mut cb) = *self.on_event.borrow_mut() {
                    cb(name, args);
                }
            }
            FrameAction::ConnectRejected(reason) => {
                tracing::warn!(namespace = %self.namespace, %reason, "Server refused push namespace");
                self.session_end.set(Some(SessionEnd::Rejected));
                self.close_transport();
            }
            FrameAction::ServerDisconnect => {
                tracing::info!(namespace = %self.namespace, "Server closed push namespace");
                self.session_end.set(Some(SessionEnd::Closed));
                self.close_transport();
            }
            FrameAction::TransportClose => self.close_transport(),
            FrameAction::Ignore => {}
        }
    }

    fn handle_close(&self) {
        self.outbox.borrow_mut().close();
        *self.ws.borrow_mut() = None;

        if self.intentional_disconnect.get() {
            self.set_state(ConnectionState::Disconnected);
            return;
        }
        match self.session_end.get() {
            Some(SessionEnd::Rejected) => {
                self.set_state(ConnectionState::Failed);
                return;
            }
            Some(SessionEnd::Closed) => {
                self.set_state(ConnectionState::Disconnected);
                return;
            }
            Some(SessionEnd::Dropped { .. }) | None => {}
        }

        self.set_state(ConnectionState::Reconnecting);
        let next = self.reconnect.borrow_mut().next_delay_and_advance();
        let Some(delay) = next else {
            tracing::error!("Max reconnection attempts reached, giving up");
            self.set_state(ConnectionState::Failed);
            return;
        };
        {
            let reconnect = self.reconnect.borrow();
            tracing::info!(
                "Reconnection attempt {} of {}, waiting {}ms",
                reconnect.attempts(),
                reconnect.max_attempts(),
                delay
            );
        }

        let client = self.clone();
        wasm_bindgen_futures::spawn_local(async move {
            TimeoutFuture::new(u32::try_from(delay).unwrap_or(u32::MAX)).await;
            if client.intentional_disconnect.get() {
                tracing::info!("Reconnection cancelled - intentional disconnect");
                client.set_state(ConnectionState::Disconnected);
                return;
            }
            if let Err(e) = client.connect() {
                tracing::warn!("Push reconnection failed: {}", e);
                client.handle_close();
            }
        });
    }

    /// Send an event, buffering it until the namespace is joined
    pub fn emit(&self, event: &str, payload: Option<Value>) {
        let frame =
            EnginePacket::Message(SocketPacket::event(&self.namespace, event, payload)).encode();
        let ready = self.outbox.borrow_mut().queue_or_pass(frame);
        match ready {
            Some(frame) => self.send_raw(&frame),
            None => tracing::debug!(event, "Push event buffered until connected"),
        }
    }

    pub fn disconnect(&self) {
        self.intentional_disconnect.set(true);

        if self.state() == ConnectionState::Connected {
            self.send_raw(&EnginePacket::Message(SocketPacket::disconnect(&self.namespace)).encode());
        }
        // Detach handlers first: the closures are dropped before the close event fires.
        if let Some(ws) = self.ws.borrow_mut().take() {
            ws.set_onmessage(None);
            ws.set_onclose(None);
            ws.set_onerror(None);
            let _ = ws.close();
        }
        *self.closures.borrow_mut() = None;
        self.outbox.borrow_mut().close();
        self.set_state(ConnectionState::Disconnected);
    }
}

impl Clone for ChannelClient {
    fn clone(&self) -> Self {
        Self {
            url: self.url.clone(),
            namespace: self.namespace.clone(),
            state: Rc::clone(&self.state),
            ws: Rc::clone(&self.ws),
            outbox: Rc::clone(&self.outbox),
            reconnect: Rc::clone(&self.reconnect),
            session_end: Rc::clone(&self.session_end),
            intentional_disconnect: Rc::clone(&self.intentional_disconnect),
            on_event: Rc::clone(&self.on_event),
            on_state_change: Rc::clone(&self.on_state_change),
            closures: Rc::clone(&self.closures),
        }
    }
}
