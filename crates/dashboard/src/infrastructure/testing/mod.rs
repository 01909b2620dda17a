//! Test doubles for infrastructure components.

#[cfg(not(target_arch = "wasm32"))]
pub mod fixtures;
