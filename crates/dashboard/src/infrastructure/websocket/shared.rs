//! Shared helpers for the platform-specific WebSocket clients.
//!
//! This module is runtime-agnostic (no tokio, no web-sys) so it can be used by
//! both the desktop and WASM implementations.

use serde_json::Value;

use quizdash_shared::{EnginePacket, Namespace, SocketPacket};

// Reconnection constants (kept here so desktop + wasm stay in sync)
pub const RECONNECT_ATTEMPTS: u32 = 5;
pub const RECONNECT_DELAY_MS: u64 = 1_000;

/// Frames queued while the namespace is not joined yet
pub const OUTBOX_CAPACITY: usize = 64;

/// Fixed-delay reconnection policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub max_attempts: u32,
    pub delay_ms: u64,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            max_attempts: RECONNECT_ATTEMPTS,
            delay_ms: RECONNECT_DELAY_MS,
        }
    }
}

/// What a client should do with one inbound text frame
#[derive(Debug, Clone, PartialEq)]
pub enum FrameAction {
    /// Write this frame back (namespace join after open, pong after ping)
    Reply(String),
    /// The server acknowledged our namespace join
    NamespaceConnected,
    /// Event for our namespace
    Event { name: String, args: Vec<Value> },
    /// The server refused the namespace join
    ConnectRejected(String),
    /// The server removed us from the namespace
    ServerDisconnect,
    /// The server is closing the transport
    TransportClose,
    Ignore,
}

/// Map one inbound frame onto the action the client takes for `namespace`.
///
/// Undecodable frames are logged and ignored; one bad frame never tears the
/// connection down.
pub fn interpret_frame(text: &str, namespace: &Namespace) -> FrameAction {
    let packet = match EnginePacket::decode(text) {
        Ok(packet) => packet,
        Err(e) => {
            tracing::warn!(error = %e, "Ignoring undecodable push frame");
            return FrameAction::Ignore;
        }
    };

    match packet {
        EnginePacket::Open(handshake) => {
            tracing::debug!(sid = %handshake.sid, ping_interval = handshake.ping_interval, "Engine session open");
            FrameAction::Reply(EnginePacket::Message(SocketPacket::connect(namespace)).encode())
        }
        EnginePacket::Ping(data) => FrameAction::Reply(EnginePacket::pong_for(&data).encode()),
        EnginePacket::Close => FrameAction::TransportClose,
        EnginePacket::Message(packet) if packet.namespace() != namespace => {
            tracing::trace!(namespace = %packet.namespace(), "Ignoring packet for another namespace");
            FrameAction::Ignore
        }
        EnginePacket::Message(SocketPacket::Connect { .. }) => FrameAction::NamespaceConnected,
        EnginePacket::Message(SocketPacket::Event { name, args, .. }) => {
            FrameAction::Event { name, args }
        }
        EnginePacket::Message(SocketPacket::ConnectError { data, .. }) => {
            FrameAction::ConnectRejected(connect_error_message(data.as_ref()))
        }
        EnginePacket::Message(SocketPacket::Disconnect { .. }) => FrameAction::ServerDisconnect,
        EnginePacket::Message(SocketPacket::Ack { .. })
        | EnginePacket::Pong(_)
        | EnginePacket::Upgrade
        | EnginePacket::Noop => FrameAction::Ignore,
    }
}

fn connect_error_message(data: Option<&Value>) -> String {
    match data {
        Some(Value::Object(map)) => map
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("connection refused")
            .to_string(),
        Some(Value::String(message)) => message.clone(),
        _ => "connection refused".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dashboard() -> Namespace {
        Namespace::dashboard()
    }

    #[test]
    fn open_is_answered_with_namespace_join() {
        let action = interpret_frame(
            r#"0{"sid":"abc","upgrades":[],"pingInterval":25000,"pingTimeout":20000}"#,
            &dashboard(),
        );
        assert_eq!(action, FrameAction::Reply("40/dashboard,".to_string()));

        let root = interpret_frame(
            r#"0{"sid":"abc","pingInterval":25000,"pingTimeout":20000}"#,
            &Namespace::root(),
        );
        assert_eq!(root, FrameAction::Reply("40".to_string()));
    }

    #[test]
    fn ping_is_answered_with_pong() {
        assert_eq!(
            interpret_frame("2", &dashboard()),
            FrameAction::Reply("3".to_string())
        );
    }

    #[test]
    fn events_are_filtered_by_namespace() {
        let ours = interpret_frame(r#"42/dashboard,["dashboard-update",{"rooms":[]}]"#, &dashboard());
        assert_eq!(
            ours,
            FrameAction::Event {
                name: "dashboard-update".into(),
                args: vec![json!({"rooms": []})]
            }
        );

        let theirs = interpret_frame(r#"42["dashboard-update",{"rooms":[]}]"#, &dashboard());
        assert_eq!(theirs, FrameAction::Ignore);
    }

    #[test]
    fn connect_ack_and_rejection() {
        assert_eq!(
            interpret_frame(r#"40/dashboard,{"sid":"x"}"#, &dashboard()),
            FrameAction::NamespaceConnected
        );
        assert_eq!(
            interpret_frame(r#"44/dashboard,{"message":"not authorized"}"#, &dashboard()),
            FrameAction::ConnectRejected("not authorized".into())
        );
    }

    #[test]
    fn disconnects_and_garbage() {
        assert_eq!(
            interpret_frame("41/dashboard,", &dashboard()),
            FrameAction::ServerDisconnect
        );
        assert_eq!(interpret_frame("1", &dashboard()), FrameAction::TransportClose);
        assert_eq!(interpret_frame("", &dashboard()), FrameAction::Ignore);
        assert_eq!(interpret_frame("9zzz", &dashboard()), FrameAction::Ignore);
    }

    #[test]
    fn default_policy_is_five_attempts_one_second_apart() {
        let policy = ReconnectPolicy::default();
        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.delay_ms, 1_000);
    }
}
