//! Application layer: typed API access, services and view-independent state.

pub mod api;
pub mod auth_flow;
pub mod dashboard;
pub mod dto;
pub mod error;
pub mod services;

pub use api::Api;
pub use error::ServiceError;
