//! Presentation layer - Dioxus UI components and state

pub mod components;
pub mod handlers;
pub mod services;
pub mod state;

pub use services::{Services, UiServices};
