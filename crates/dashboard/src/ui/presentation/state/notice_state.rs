//! Blocking notices shown in a modal banner
//!
//! Every API failure surfaces here; the form that triggered it keeps its
//! values until the admin dismisses the notice and retries.

use dioxus::prelude::*;

use crate::application::error::ServiceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

/// Text of a failed action. Validation messages are shown bare, everything
/// else is prefixed with the action that failed.
pub fn failure_message(action: &str, err: &ServiceError) -> String {
    match err {
        ServiceError::Validation(message) => message.clone(),
        other => format!("{}: {}", action, other),
    }
}

#[derive(Clone, Copy)]
pub struct NoticeState {
    current: Signal<Option<Notice>>,
}

impl NoticeState {
    pub fn new() -> Self {
        Self {
            current: Signal::new(None),
        }
    }

    pub fn current(&self) -> Option<Notice> {
        self.current.read().clone()
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.current.set(Some(Notice {
            kind: NoticeKind::Success,
            message: message.into(),
        }));
    }

    pub fn error(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(%message, "Showing error notice");
        self.current.set(Some(Notice {
            kind: NoticeKind::Error,
            message,
        }));
    }

    pub fn dismiss(&mut self) {
        self.current.set(None);
    }
}

impl Default for NoticeState {
    fn default() -> Self {
        Self::new()
    }
}

pub fn use_notice_state() -> NoticeState {
    use_context::<NoticeState>()
}
