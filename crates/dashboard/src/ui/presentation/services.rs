//! Service providers for the presentation layer
//!
//! The composition root builds one [`Services`] bundle and hands it to Dioxus
//! as context. Components reach the application services through the hooks
//! below and never touch infrastructure adapters directly.

use std::sync::Arc;

use dioxus::prelude::*;

use crate::application::api::Api;
use crate::application::services::{
    AuthService, QuestionService, SessionStore, StatsService, UserService,
};
use crate::infrastructure::ChannelManager;
use crate::ports::outbound::{ApiPort, StorageProvider, TimeProvider};
use crate::state::Platform;

/// Concrete service bundle type used by the UI.
pub type UiServices = Services<Api, Platform>;

#[derive(Clone)]
pub struct Services<A: ApiPort, P: StorageProvider + TimeProvider> {
    pub auth: Arc<AuthService<A, P>>,
    pub stats: Arc<StatsService<A>>,
    pub users: Arc<UserService<A>>,
    pub questions: Arc<QuestionService<A>>,
    /// Owner of the push channels; the dashboard releases its channel on unmount
    pub channels: Arc<ChannelManager>,
}

impl<A: ApiPort, P: StorageProvider + TimeProvider> Services<A, P> {
    pub fn new(api: A, sessions: SessionStore<P>, channels: Arc<ChannelManager>) -> Self {
        Self {
            auth: Arc::new(AuthService::new(api.clone(), sessions)),
            stats: Arc::new(StatsService::new(api.clone())),
            users: Arc::new(UserService::new(api.clone())),
            questions: Arc::new(QuestionService::new(api)),
            channels,
        }
    }
}

/// Hook to access the AuthService from context
pub fn use_auth_service() -> Arc<AuthService<Api, Platform>> {
    let services = use_context::<UiServices>();
    services.auth.clone()
}

/// Hook to access the StatsService from context
pub fn use_stats_service() -> Arc<StatsService<Api>> {
    let services = use_context::<UiServices>();
    services.stats.clone()
}

/// Hook to access the ChannelManager from context
pub fn use_channel_manager() -> Arc<ChannelManager> {
    let services = use_context::<UiServices>();
    services.channels.clone()
}
