//! WebSocket push channel client
//!
//! Platform-specific implementations are in submodules:
//! - `desktop`: tokio-tungstenite based client
//! - `wasm`: web-sys WebSocket based client
//! - `bridge`: wires a client to the command/event buses

mod bridge;
mod core;
mod shared;

#[cfg(not(target_arch = "wasm32"))]
mod desktop;

#[cfg(target_arch = "wasm32")]
mod wasm;

pub use bridge::create_channel;
pub use shared::{ReconnectPolicy, RECONNECT_ATTEMPTS, RECONNECT_DELAY_MS};

#[cfg(not(target_arch = "wasm32"))]
pub use desktop::ChannelClient;

#[cfg(target_arch = "wasm32")]
pub use wasm::ChannelClient;
