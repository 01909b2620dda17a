//! Outbound ports - Interfaces for external services
//!
//! These ports define the contracts that infrastructure adapters must implement,
//! allowing application services to talk to the game server and the host
//! platform without depending on concrete implementations.

pub mod api_port;
pub mod platform;
pub mod raw_api_port;

pub use api_port::{ApiError, ApiPort};
pub use platform::{storage_keys, DocumentProvider, SleepProvider, StorageProvider, TimeProvider};
pub use raw_api_port::RawApiPort;

#[cfg(any(test, feature = "testing"))]
pub use raw_api_port::MockRawApiPort;
