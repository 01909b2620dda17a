//! Modal banner for the current notice

use dioxus::prelude::*;

use crate::ui::presentation::state::{use_notice_state, NoticeKind};

#[component]
pub fn NoticeModal() -> Element {
    let mut notices = use_notice_state();

    let Some(notice) = notices.current() else {
        return rsx! {};
    };
    let (icon, kind_class) = match notice.kind {
        NoticeKind::Success => ("✅", "notice-success"),
        NoticeKind::Error => ("❌", "notice-error"),
    };

    rsx! {
        div {
            class: "notice-backdrop",
            div {
                class: "notice {kind_class}",
                p { "{icon} {notice.message}" }
                button {
                    class: "btn",
                    onclick: move |_| notices.dismiss(),
                    "OK"
                }
            }
        }
    }
}
