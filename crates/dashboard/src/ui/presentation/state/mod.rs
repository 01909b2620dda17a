//! Signal-backed UI state shared through Dioxus context

pub mod auth_state;
pub mod notice_state;

pub use auth_state::{use_auth_state, AuthState};
pub use notice_state::{failure_message, use_notice_state, Notice, NoticeKind, NoticeState};
