//! Command Bus and Event Bus messaging infrastructure.
//!
//! This module provides the messaging layer between a push channel handle and
//! its transport task:
//! - `CommandBus`: queue outbound events for the transport
//! - `EventBus`: named-event handler registry fed by the transport
//! - `ConnectionHandle`: manage connection lifecycle
//!
//! The WebSocket bridge (in the websocket module) connects these buses to the actual transport.

pub mod command_bus;
pub mod connection;
pub mod event_bus;

pub use command_bus::{BusMessage, ChannelError, CommandBus};
pub use connection::{
    set_connection_state, ConnectionHandle, ConnectionState, ConnectionStateObserver,
};
pub use event_bus::{EventBus, HandlerId};
