//! Infrastructure layer: platform providers, HTTP and push transports.

pub mod channel;
pub mod channel_manager;
pub mod http_client;
pub mod messaging;
pub mod platform;
pub mod websocket;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use channel::Channel;
pub use channel_manager::{ChannelConnector, ChannelManager, WebSocketConnector};
pub use http_client::ApiAdapter;
