//! Push channel framing (Engine.IO v4 carrying Socket.IO v5 packets).
//!
//! Only the text subset used by the dashboard is supported: the WebSocket
//! transport without polling fallback, JSON payloads, no binary attachments.
//!
//! ```text
//! 0{"sid":"..","pingInterval":25000,..}   engine open
//! 2                                       engine ping  -> answer "3"
//! 40/dashboard,                           socket connect to /dashboard
//! 42/dashboard,["dashboard-join"]         socket event
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Engine.IO protocol revision spoken by the client
pub const ENGINE_IO_VERSION: u8 = 4;

/// Path of the Socket.IO endpoint on the server
pub const SOCKET_IO_PATH: &str = "/socket.io/";

/// Errors produced while decoding a frame
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("empty frame")]
    Empty,
    #[error("unknown packet type '{0}'")]
    UnknownPacketType(char),
    #[error("unsupported packet type '{0}' (binary attachments)")]
    UnsupportedPacketType(char),
    #[error("invalid namespace: {0}")]
    InvalidNamespace(String),
    #[error("invalid ack id: {0}")]
    InvalidAckId(String),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(String),
    #[error("invalid event payload: {0}")]
    InvalidEventPayload(String),
}

// =============================================================================
// Namespace
// =============================================================================

/// Socket.IO namespace such as `/` or `/dashboard`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Namespace(String);

impl Namespace {
    /// The default namespace `/`
    pub fn root() -> Self {
        Self("/".to_string())
    }

    /// The admin dashboard namespace
    pub fn dashboard() -> Self {
        Self("/dashboard".to_string())
    }

    pub fn new(path: impl Into<String>) -> Result<Self, ProtocolError> {
        let path = path.into();
        if !path.starts_with('/') || path.contains(',') {
            return Err(ProtocolError::InvalidNamespace(path));
        }
        Ok(Self(path))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Engine.IO layer
// =============================================================================

/// Handshake data sent by the server in the `open` packet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenHandshake {
    pub sid: String,
    #[serde(default)]
    pub upgrades: Vec<String>,
    pub ping_interval: u64,
    pub ping_timeout: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_payload: Option<u64>,
}

/// Transport-level packet
#[derive(Debug, Clone, PartialEq)]
pub enum EnginePacket {
    Open(OpenHandshake),
    Close,
    Ping(String),
    Pong(String),
    Message(SocketPacket),
    Upgrade,
    Noop,
}

impl EnginePacket {
    /// Reply to a server heartbeat, echoing its probe data
    pub fn pong_for(ping_data: &str) -> Self {
        EnginePacket::Pong(ping_data.to_string())
    }

    pub fn encode(&self) -> String {
        match self {
            EnginePacket::Open(handshake) => {
                // Handshake only contains strings and integers
                let json = serde_json::to_string(handshake).unwrap_or_default();
                format!("0{}", json)
            }
            EnginePacket::Close => "1".to_string(),
            EnginePacket::Ping(data) => format!("2{}", data),
            EnginePacket::Pong(data) => format!("3{}", data),
            EnginePacket::Message(packet) => format!("4{}", packet.encode()),
            EnginePacket::Upgrade => "5".to_string(),
            EnginePacket::Noop => "6".to_string(),
        }
    }

    pub fn decode(frame: &str) -> Result<Self, ProtocolError> {
        let mut chars = frame.chars();
        let kind = chars.next().ok_or(ProtocolError::Empty)?;
        let rest = chars.as_str();

        match kind {
            '0' => serde_json::from_str(rest)
                .map(EnginePacket::Open)
                .map_err(|e| ProtocolError::InvalidJson(e.to_string())),
            '1' => Ok(EnginePacket::Close),
            '2' => Ok(EnginePacket::Ping(rest.to_string())),
            '3' => Ok(EnginePacket::Pong(rest.to_string())),
            '4' => SocketPacket::decode(rest).map(EnginePacket::Message),
            '5' => Ok(EnginePacket::Upgrade),
            '6' => Ok(EnginePacket::Noop),
            'b' => Err(ProtocolError::UnsupportedPacketType(kind)),
            other => Err(ProtocolError::UnknownPacketType(other)),
        }
    }
}

// =============================================================================
// Socket.IO layer
// =============================================================================

/// Namespace-level packet carried inside an engine `message`
#[derive(Debug, Clone, PartialEq)]
pub enum SocketPacket {
    Connect {
        namespace: Namespace,
        data: Option<Value>,
    },
    Disconnect {
        namespace: Namespace,
    },
    Event {
        namespace: Namespace,
        ack_id: Option<u64>,
        name: String,
        args: Vec<Value>,
    },
    Ack {
        namespace: Namespace,
        ack_id: u64,
        args: Vec<Value>,
    },
    ConnectError {
        namespace: Namespace,
        data: Option<Value>,
    },
}

impl SocketPacket {
    /// Join request for a namespace
    pub fn connect(namespace: &Namespace) -> Self {
        SocketPacket::Connect {
            namespace: namespace.clone(),
            data: None,
        }
    }

    /// Leave request for a namespace
    pub fn disconnect(namespace: &Namespace) -> Self {
        SocketPacket::Disconnect {
            namespace: namespace.clone(),
        }
    }

    /// Fire-and-forget event; `None` sends the bare event name
    pub fn event(namespace: &Namespace, name: &str, payload: Option<Value>) -> Self {
        SocketPacket::Event {
            namespace: namespace.clone(),
            ack_id: None,
            name: name.to_string(),
            args: payload.into_iter().collect(),
        }
    }

    pub fn namespace(&self) -> &Namespace {
        match self {
            SocketPacket::Connect { namespace, .. }
            | SocketPacket::Disconnect { namespace }
            | SocketPacket::Event { namespace, .. }
            | SocketPacket::Ack { namespace, .. }
            | SocketPacket::ConnectError { namespace, .. } => namespace,
        }
    }

    pub fn encode(&self) -> String {
        let (kind, ack_id, payload) = match self {
            SocketPacket::Connect { data, .. } => ('0', None, data.clone()),
            SocketPacket::Disconnect { .. } => ('1', None, None),
            SocketPacket::Event {
                ack_id, name, args, ..
            } => {
                let mut items = Vec::with_capacity(args.len() + 1);
                items.push(Value::String(name.clone()));
                items.extend(args.iter().cloned());
                ('2', *ack_id, Some(Value::Array(items)))
            }
            SocketPacket::Ack { ack_id, args, .. } => {
                ('3', Some(*ack_id), Some(Value::Array(args.clone())))
            }
            SocketPacket::ConnectError { data, .. } => ('4', None, data.clone()),
        };

        let mut out = String::new();
        out.push(kind);
        let namespace = self.namespace();
        if !namespace.is_root() {
            out.push_str(namespace.as_str());
            out.push(',');
        }
        if let Some(id) = ack_id {
            out.push_str(&id.to_string());
        }
        if let Some(payload) = payload {
            out.push_str(&payload.to_string());
        }
        out
    }

    pub fn decode(input: &str) -> Result<Self, ProtocolError> {
        let mut chars = input.chars();
        let kind = chars.next().ok_or(ProtocolError::Empty)?;
        let mut rest = chars.as_str();

        let namespace = if rest.starts_with('/') {
            let (path, remainder) = match rest.find(',') {
                Some(idx) => (&rest[..idx], &rest[idx + 1..]),
                None => (rest, ""),
            };
            rest = remainder;
            Namespace::new(path)?
        } else {
            Namespace::root()
        };

        let digits = rest.chars().take_while(|c| c.is_ascii_digit()).count();
        let ack_id = if digits > 0 {
            let (id, remainder) = rest.split_at(digits);
            rest = remainder;
            Some(
                id.parse::<u64>()
                    .map_err(|_| ProtocolError::InvalidAckId(id.to_string()))?,
            )
        } else {
            None
        };

        let payload = if rest.is_empty() {
            None
        } else {
            Some(
                serde_json::from_str::<Value>(rest)
                    .map_err(|e| ProtocolError::InvalidJson(e.to_string()))?,
            )
        };

        match kind {
            '0' => Ok(SocketPacket::Connect {
                namespace,
                data: payload,
            }),
            '1' => Ok(SocketPacket::Disconnect { namespace }),
            '2' => {
                let (name, args) = split_event(payload)?;
                Ok(SocketPacket::Event {
                    namespace,
                    ack_id,
                    name,
                    args,
                })
            }
            '3' => {
                let ack_id = ack_id
                    .ok_or_else(|| ProtocolError::InvalidAckId("missing".to_string()))?;
                let args = match payload {
                    Some(Value::Array(args)) => args,
                    None => Vec::new(),
                    Some(other) => {
                        return Err(ProtocolError::InvalidEventPayload(other.to_string()))
                    }
                };
                Ok(SocketPacket::Ack {
                    namespace,
                    ack_id,
                    args,
                })
            }
            '4' => Ok(SocketPacket::ConnectError {
                namespace,
                data: payload,
            }),
            '5' | '6' => Err(ProtocolError::UnsupportedPacketType(kind)),
            other => Err(ProtocolError::UnknownPacketType(other)),
        }
    }
}

/// Split an event array `[name, ...args]`
fn split_event(payload: Option<Value>) -> Result<(String, Vec<Value>), ProtocolError> {
    let Some(Value::Array(mut items)) = payload else {
        return Err(ProtocolError::InvalidEventPayload(
            "expected an array".to_string(),
        ));
    };
    if items.is_empty() {
        return Err(ProtocolError::InvalidEventPayload(
            "missing event name".to_string(),
        ));
    }
    match items.remove(0) {
        Value::String(name) => Ok((name, items)),
        other => Err(ProtocolError::InvalidEventPayload(format!(
            "event name must be a string, got {}",
            other
        ))),
    }
}
