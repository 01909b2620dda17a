//! Entry route - sends the admin to the dashboard or the login form

use dioxus::prelude::*;

use super::Route;
use crate::ui::presentation::state::use_auth_state;

#[component]
pub fn HomeRoute() -> Element {
    let navigator = use_navigator();
    let auth = use_auth_state();

    use_effect(move || {
        if auth.is_logged_in() {
            navigator.replace(Route::DashboardRoute {});
        } else {
            navigator.replace(Route::LoginRoute {});
        }
    });

    rsx! {
        div { class: "loading-screen", "Loading QuizDash..." }
    }
}
