//! Application-wide state containers injected through Dioxus context.

pub mod platform;

pub use platform::Platform;
