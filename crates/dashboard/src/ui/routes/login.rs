//! Admin login form

use dioxus::prelude::*;

use super::Route;
use crate::application::auth_flow::AuthEvent;
use crate::ui::presentation::services::use_auth_service;
use crate::ui::presentation::state::{failure_message, use_auth_state, use_notice_state};
use crate::ui::use_platform;

#[component]
pub fn LoginRoute() -> Element {
    let navigator = use_navigator();
    let platform = use_platform();
    let auth_service = use_auth_service();
    let mut auth = use_auth_state();
    let mut notices = use_notice_state();

    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut loading = use_signal(|| false);

    use_hook(move || platform.set_page_title("QuizDash | Admin login"));

    use_effect(move || {
        if auth.is_logged_in() {
            navigator.replace(Route::DashboardRoute {});
        }
    });

    let onsubmit = move |evt: FormEvent| {
        evt.prevent_default();
        if loading() {
            return;
        }
        loading.set(true);

        let auth_service = auth_service.clone();
        let (email_value, password_value) = (email(), password());
        spawn(async move {
            match auth_service.login(&email_value, &password_value).await {
                Ok(session) => {
                    email.set(String::new());
                    password.set(String::new());
                    loading.set(false);
                    auth.apply(AuthEvent::Authenticated(session));
                    navigator.replace(Route::DashboardRoute {});
                }
                Err(e) => {
                    loading.set(false);
                    notices.error(failure_message("Login failed", &e));
                }
            }
        });
    };

    rsx! {
        div {
            class: "auth-screen",
            form {
                class: "auth-card",
                onsubmit,
                h1 { "🎮 Admin login" }

                label { r#for: "login-email", "Email" }
                input {
                    id: "login-email",
                    r#type: "email",
                    placeholder: "admin@example.com",
                    value: "{email}",
                    disabled: loading(),
                    oninput: move |evt| email.set(evt.value()),
                }

                label { r#for: "login-password", "Password" }
                input {
                    id: "login-password",
                    r#type: "password",
                    value: "{password}",
                    disabled: loading(),
                    oninput: move |evt| password.set(evt.value()),
                }

                button {
                    class: "btn btn-primary",
                    r#type: "submit",
                    disabled: loading(),
                    if loading() { "Signing in..." } else { "Sign in" }
                }

                p {
                    class: "auth-switch",
                    "No admin account yet? "
                    button {
                        class: "btn-link",
                        r#type: "button",
                        disabled: loading(),
                        onclick: move |_| {
                            auth.apply(AuthEvent::ShowRegister);
                            navigator.push(Route::RegisterRoute {});
                        },
                        "Create one"
                    }
                }
            }
        }
    }
}
