//! Live dashboard route
//!
//! Mount: check the persisted session, join `/dashboard` through the channel
//! manager, subscribe to `dashboard-update`, ask for a snapshot with
//! `dashboard-join` and fetch the statistics once. Unmount: drop the handler,
//! invalidate in-flight results and release the channel.

use dioxus::prelude::*;
use futures_util::StreamExt;
use serde_json::Value;

use super::Route;
use crate::application::auth_flow::AuthEvent;
use crate::application::dashboard::{DashboardSync, MountGuard, MountToken};
use crate::infrastructure::messaging::ConnectionState;
use crate::infrastructure::Channel;
use crate::ui::presentation::components::{ConnectionIndicator, DashboardStats, RoomCard};
use crate::ui::presentation::handlers::{
    activate_dashboard, deactivate_dashboard, stats_follow_up, DashboardAttachment, StatsFollowUp,
};
use crate::ui::presentation::services::{
    use_auth_service, use_channel_manager, use_stats_service,
};
use crate::ui::presentation::state::{use_auth_state, use_notice_state};
use crate::ui::{use_platform, Platform};

/// How often the connection indicator samples the channel state
const CONNECTION_POLL_MS: u64 = 500;

#[component]
pub fn DashboardRoute() -> Element {
    let navigator = use_navigator();
    let platform = use_platform();
    let auth_service = use_auth_service();
    let stats_service = use_stats_service();
    let channels = use_channel_manager();
    let mut auth = use_auth_state();
    let mut notices = use_notice_state();

    let mut sync = use_signal(DashboardSync::default);
    let connection = use_signal(|| ConnectionState::Connecting);
    let guard = use_hook(MountGuard::new);

    let attachment = use_hook({
        let auth_service = auth_service.clone();
        let channels = channels.clone();
        let guard = guard.clone();
        move || -> Option<DashboardAttachment> {
            let (tx, mut rx) = futures_channel::mpsc::unbounded::<Option<Value>>();
            let session = auth_service.restore();
            let attachment = activate_dashboard(
                session.as_ref(),
                &guard,
                &channels,
                Box::new(move |payload| {
                    let _ = tx.unbounded_send(payload);
                }),
            )?;
            platform.set_page_title("QuizDash | Dashboard");
            let token = attachment.token;

            // Room updates, in arrival order
            let updates_guard = guard.clone();
            spawn(async move {
                while let Some(payload) = rx.next().await {
                    sync.write()
                        .apply_room_update(&updates_guard, token, payload.as_ref());
                }
            });

            // One statistics snapshot per mount
            let stats_guard = guard.clone();
            let expired_service = auth_service.clone();
            spawn(async move {
                let result = stats_service.fetch_global_stats().await;
                let failure = result.as_ref().err().cloned();
                if !sync.write().apply_stats(&stats_guard, token, result) {
                    return;
                }
                match stats_follow_up(failure.as_ref()) {
                    StatsFollowUp::Nothing => {}
                    StatsFollowUp::SignOut(message) => {
                        tracing::warn!("Statistics request rejected, signing out");
                        expired_service.logout();
                        auth.apply(AuthEvent::LogOut);
                        notices.error(message);
                        navigator.replace(Route::LoginRoute {});
                    }
                    StatsFollowUp::Notify(message) => notices.error(message),
                }
            });

            poll_connection(
                platform,
                attachment.channel.clone(),
                guard.clone(),
                token,
                connection,
            );

            Some(attachment)
        }
    });

    let has_attachment = attachment.is_some();
    use_effect(move || {
        if !has_attachment {
            auth.apply(AuthEvent::LogOut);
            auth.apply(AuthEvent::ShowLogin);
            navigator.replace(Route::LoginRoute {});
        }
    });

    use_drop({
        let guard = guard.clone();
        let attachment = attachment.clone();
        let channels = channels.clone();
        move || deactivate_dashboard(attachment.as_ref(), &guard, &channels)
    });

    let on_logout = move |_| {
        auth_service.logout();
        auth.apply(AuthEvent::LogOut);
        auth.apply(AuthEvent::ShowLogin);
        navigator.replace(Route::LoginRoute {});
    };

    if !has_attachment {
        return rsx! {
            div { class: "loading-screen", "Redirecting to login..." }
        };
    }

    let admin_name = auth
        .session()
        .map(|session| session.display_name().to_string())
        .unwrap_or_default();
    let rooms = sync.read().rooms.rooms().to_vec();
    let snapshot = sync.read().stats.clone();

    rsx! {
        div {
            class: "dashboard",
            header {
                class: "dashboard-header",
                h1 { "🎮 Game dashboard" }
                div {
                    class: "dashboard-actions",
                    ConnectionIndicator { state: connection() }
                    if !admin_name.is_empty() {
                        span { class: "admin-name", "👤 {admin_name}" }
                    }
                    button {
                        class: "btn btn-logout",
                        onclick: on_logout,
                        "🔒 Log out"
                    }
                }
            }

            DashboardStats { snapshot }

            section {
                class: "rooms",
                h2 { "🏟️ Active rooms" }
                if rooms.is_empty() {
                    div {
                        class: "rooms-empty",
                        p { "🎯 No active games right now" }
                        p { class: "rooms-empty-hint", "Games will show up here as soon as players connect!" }
                    }
                } else {
                    div {
                        class: "rooms-grid",
                        for room in rooms.iter() {
                            RoomCard { key: "{room.room_id}", room: room.clone() }
                        }
                    }
                }
            }
        }
    }
}

/// Mirror the channel state into `connection` while this mount is current
fn poll_connection(
    platform: Platform,
    channel: Channel,
    guard: MountGuard,
    token: MountToken,
    mut connection: Signal<ConnectionState>,
) {
    spawn(async move {
        while guard.is_current(token) {
            let state = channel.state();
            if *connection.peek() != state {
                tracing::debug!(%state, "Dashboard channel state changed");
                connection.set(state);
            }
            platform.sleep_ms(CONNECTION_POLL_MS).await;
        }
    });
}
