//! QuizDash admin dashboard.
//!
//! This crate contains the UI, application logic and infrastructure adapters
//! of the admin console. Multi-platform support (desktop and browser) is
//! provided via compile-time `cfg` selection.

pub mod application;
pub mod config;
pub mod infrastructure;
pub mod ports;
pub mod state;
pub mod ui;

// Re-export commonly used entrypoints
pub use ui::app;
pub use ui::{use_platform, Platform, Route};
