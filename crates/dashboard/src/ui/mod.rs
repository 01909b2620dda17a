use dioxus::prelude::*;

pub mod presentation;
pub mod routes;

pub use routes::Route;

pub use crate::state::Platform;

use presentation::components::NoticeModal;
use presentation::services::{use_auth_service, use_channel_manager};
use presentation::state::{AuthState, NoticeState};

const MAIN_CSS: &str = include_str!("../../assets/main.css");

/// Hook to access the Platform from Dioxus context
pub fn use_platform() -> Platform {
    use_context::<Platform>()
}

pub fn app() -> Element {
    rsx! {
        AppRoot {}
    }
}

#[component]
fn AppRoot() -> Element {
    // Services are provided by the composition root (see `src/main.rs`).
    let auth_service = use_auth_service();
    let channels = use_channel_manager();

    // Boot: a valid persisted session goes straight to the dashboard.
    use_context_provider(move || AuthState::boot(auth_service.restore()));
    use_context_provider(NoticeState::new);

    // Window closed or app torn down: no transport outlives the UI.
    use_drop(move || channels.close_all());

    rsx! {
        style { "{MAIN_CSS}" }

        div {
            class: "app-shell",
            NoticeModal {}
            Router::<routes::Route> {}
        }
    }
}
