//! Admin registration form

use dioxus::prelude::*;

use super::Route;
use crate::application::auth_flow::AuthEvent;
use crate::application::services::auth_service::MIN_PASSWORD_LEN;
use crate::ui::presentation::services::use_auth_service;
use crate::ui::presentation::state::{failure_message, use_auth_state, use_notice_state};
use crate::ui::use_platform;

#[component]
pub fn RegisterRoute() -> Element {
    let navigator = use_navigator();
    let platform = use_platform();
    let auth_service = use_auth_service();
    let mut auth = use_auth_state();
    let mut notices = use_notice_state();

    let mut name = use_signal(String::new);
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut loading = use_signal(|| false);

    use_hook(move || platform.set_page_title("QuizDash | New admin"));

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
        let (name_value, email_value, password_value) = (name(), email(), password());
        spawn(async move {
            match auth_service
                .register_admin(&name_value, &email_value, &password_value)
                .await
            {
                Ok(session) => {
                    name.set(String::new());
                    email.set(String::new());
                    password.set(String::new());
                    loading.set(false);
                    notices.success("Admin user created successfully");
                    auth.apply(AuthEvent::Authenticated(session));
                    navigator.replace(Route::DashboardRoute {});
                }
                Err(e) => {
                    loading.set(false);
                    notices.error(failure_message("Registration failed", &e));
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
                h1 { "🛡️ New admin" }

                label { r#for: "register-name", "Name" }
                input {
                    id: "register-name",
                    value: "{name}",
                    disabled: loading(),
                    oninput: move |evt| name.set(evt.value()),
                }

                label { r#for: "register-email", "Email" }
                input {
                    id: "register-email",
                    r#type: "email",
                    value: "{email}",
                    disabled: loading(),
                    oninput: move |evt| email.set(evt.value()),
                }

                label { r#for: "register-password", "Password" }
                input {
                    id: "register-password",
                    r#type: "password",
                    minlength: "{MIN_PASSWORD_LEN}",
                    value: "{password}",
                    disabled: loading(),
                    oninput: move |evt| password.set(evt.value()),
                }

                button {
                    class: "btn btn-primary",
                    r#type: "submit",
                    disabled: loading(),
                    if loading() { "Creating..." } else { "Create admin" }
                }

                p {
                    class: "auth-switch",
                    "Already registered? "
                    button {
                        class: "btn-link",
                        r#type: "button",
                        disabled: loading(),
                        onclick: move |_| {
                            auth.apply(AuthEvent::ShowLogin);
                            navigator.push(Route::LoginRoute {});
                        },
                        "Sign in"
                    }
                }
            }
        }
    }
}
