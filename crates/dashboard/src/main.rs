//! QuizDash Dashboard - composition root binary.

use std::sync::Arc;

#[cfg(not(target_arch = "wasm32"))]
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use quizdash_dashboard::application::api::Api;
use quizdash_dashboard::application::services::SessionStore;
use quizdash_dashboard::config::DashboardConfig;
use quizdash_dashboard::infrastructure::{ApiAdapter, ChannelManager, WebSocketConnector};
use quizdash_dashboard::ui::presentation::Services;

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    {
        // A missing .env is fine; the environment and defaults still apply.
        let _ = dotenvy::dotenv();

        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "quizdash_dashboard=debug,dioxus=info".into()),
            )
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    #[cfg(target_arch = "wasm32")]
    {
        console_error_panic_hook::set_once();
        tracing_wasm::set_as_global_default();
    }

    let config = DashboardConfig::from_env();
    tracing::info!(api_url = %config.api_url, "Starting QuizDash Dashboard");

    // Platform
    let platform = quizdash_dashboard::infrastructure::platform::create_platform();

    // HTTP
    let raw_api = Arc::new(ApiAdapter::new(&config.api_url, config.request_timeout));
    let api = Api::new(raw_api);

    // Push channels
    let endpoint = match config.push_endpoint() {
        Ok(endpoint) => endpoint,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };
    let channels = Arc::new(ChannelManager::new(Arc::new(WebSocketConnector::new(
        endpoint,
        config.reconnect,
    ))));

    let sessions = SessionStore::new(platform.clone(), config.session_ttl_secs);

    // Launch Dioxus
    #[allow(unused_mut)]
    let mut builder = dioxus::LaunchBuilder::new();

    #[cfg(not(target_arch = "wasm32"))]
    {
        let window = dioxus_desktop::WindowBuilder::new().with_title("QuizDash Admin");
        builder = builder.with_cfg(dioxus_desktop::Config::new().with_window(window));
    }

    builder
        .with_context(platform)
        .with_context(Services::new(api, sessions, channels))
        .launch(quizdash_dashboard::app);
}
