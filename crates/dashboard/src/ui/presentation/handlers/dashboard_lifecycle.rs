//! Dashboard activation and teardown
//!
//! The route component only wires these into `use_hook`/`use_drop`; the
//! steps themselves run without a renderer.

use serde_json::Value;

use quizdash_shared::events;

use crate::application::dashboard::{MountGuard, MountToken};
use crate::application::dto::AdminSession;
use crate::application::error::ServiceError;
use crate::infrastructure::messaging::{ChannelError, HandlerId};
use crate::infrastructure::{Channel, ChannelManager};
use crate::ui::presentation::state::failure_message;

pub const MSG_SESSION_EXPIRED: &str = "Your session is no longer valid. Please sign in again.";

/// Receives the first argument of every `dashboard-update`
pub type UpdateSink = Box<dyn Fn(Option<Value>) + Send + Sync + 'static>;

/// The part of a push channel the dashboard talks to
#[cfg_attr(test, mockall::automock)]
pub trait DashboardFeed {
    fn subscribe_updates(&self, sink: UpdateSink) -> HandlerId;
    fn unsubscribe_updates(&self, id: HandlerId) -> bool;
    fn request_snapshot(&self) -> Result<(), ChannelError>;
}

impl DashboardFeed for Channel {
    fn subscribe_updates(&self, sink: UpdateSink) -> HandlerId {
        self.on(events::DASHBOARD_UPDATE, move |args| sink(args.first().cloned()))
    }

    fn unsubscribe_updates(&self, id: HandlerId) -> bool {
        self.off(events::DASHBOARD_UPDATE, id)
    }

    fn request_snapshot(&self) -> Result<(), ChannelError> {
        self.emit(events::DASHBOARD_JOIN, None)
    }
}

/// Subscribe, then ask for the snapshot. The reply to `dashboard-join` is
/// the first update, so the handler must already be in place.
pub fn join_feed<F: DashboardFeed + ?Sized>(feed: &F, sink: UpdateSink) -> HandlerId {
    let handler = feed.subscribe_updates(sink);
    if let Err(e) = feed.request_snapshot() {
        tracing::warn!("Failed to request room snapshot: {}", e);
    }
    handler
}

/// Drop the handler registered by [`join_feed`] and nothing else
pub fn leave_feed<F: DashboardFeed + ?Sized>(feed: &F, id: HandlerId) {
    if !feed.unsubscribe_updates(id) {
        tracing::debug!(handler = %id, "Update handler was already gone");
    }
}

/// What one dashboard mount holds on to until it is torn down
#[derive(Clone)]
pub struct DashboardAttachment {
    pub token: MountToken,
    pub channel: Channel,
    handler: HandlerId,
}

/// Start a dashboard mount for `session`.
///
/// Without a session nothing is opened and `None` is returned; the caller
/// redirects to login.
pub fn activate_dashboard(
    session: Option<&AdminSession>,
    guard: &MountGuard,
    channels: &ChannelManager,
    sink: UpdateSink,
) -> Option<DashboardAttachment> {
    let Some(session) = session else {
        tracing::info!("No valid admin session, leaving dashboard");
        return None;
    };

    let token = guard.activate();
    let channel = channels.connect_dashboard();
    let handler = join_feed(&channel, sink);
    tracing::info!(admin = %session.email, %handler, "Dashboard activated");

    Some(DashboardAttachment {
        token,
        channel,
        handler,
    })
}

/// End the current mount. Results of its requests are dropped from here on.
pub fn deactivate_dashboard(
    attachment: Option<&DashboardAttachment>,
    guard: &MountGuard,
    channels: &ChannelManager,
) {
    guard.deactivate();
    let Some(attachment) = attachment else {
        return;
    };
    leave_feed(&attachment.channel, attachment.handler);
    channels.release_dashboard();
    tracing::info!("Dashboard deactivated");
}

/// What the dashboard does after its statistics request settled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatsFollowUp {
    Nothing,
    /// Credentials were rejected: sign out and show this notice
    SignOut(String),
    Notify(String),
}

/// Decide the follow-up for a statistics result that was applied to the
/// current mount. Stale results never get here.
pub fn stats_follow_up(failure: Option<&ServiceError>) -> StatsFollowUp {
    match failure {
        None => StatsFollowUp::Nothing,
        Some(e) if e.is_auth() => StatsFollowUp::SignOut(MSG_SESSION_EXPIRED.to_string()),
        Some(e) => StatsFollowUp::Notify(failure_message("Loading statistics failed", e)),
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use mockall::predicate::eq;
    use mockall::Sequence;
    use serde_json::json;

    use quizdash_shared::{Namespace, Role};

    use crate::application::dashboard::DashboardSync;
    use crate::infrastructure::messaging::{BusMessage, EventBus};
    use crate::infrastructure::testing::fixtures::RecordingConnector;

    fn admin() -> AdminSession {
        AdminSession {
            id: None,
            name: "A".into(),
            email: "a@b.com".into(),
            role: Role::Admin,
            token: None,
            expires_at: 100,
        }
    }

    fn manager() -> (ChannelManager, Arc<RecordingConnector>) {
        let connector = Arc::new(RecordingConnector::default());
        (ChannelManager::new(connector.clone()), connector)
    }

    fn collecting_sink() -> (UpdateSink, Arc<Mutex<Vec<Option<Value>>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink_seen = Arc::clone(&seen);
        let sink: UpdateSink = Box::new(move |payload| sink_seen.lock().unwrap().push(payload));
        (sink, seen)
    }

    #[test]
    fn handler_is_registered_before_join_is_sent() {
        let id = EventBus::new().subscribe(events::DASHBOARD_UPDATE, |_| {});
        let mut seq = Sequence::new();
        let mut feed = MockDashboardFeed::new();
        feed.expect_subscribe_updates()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |_| id);
        feed.expect_request_snapshot()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(()));

        let (sink, _) = collecting_sink();
        assert_eq!(join_feed(&feed, sink), id);
    }

    #[test]
    fn failed_join_keeps_the_subscription() {
        let id = EventBus::new().subscribe(events::DASHBOARD_UPDATE, |_| {});
        let mut feed = MockDashboardFeed::new();
        feed.expect_subscribe_updates().returning(move |_| id);
        feed.expect_request_snapshot()
            .returning(|| Err(ChannelError::Closed));
        feed.expect_unsubscribe_updates().never();

        let (sink, _) = collecting_sink();
        assert_eq!(join_feed(&feed, sink), id);
    }

    #[test]
    fn missing_session_opens_nothing() {
        let (channels, connector) = manager();
        let guard = MountGuard::new();
        let (sink, _) = collecting_sink();

        let attachment = activate_dashboard(None, &guard, &channels, sink);

        assert!(attachment.is_none());
        assert_eq!(connector.open_count(), 0);
        assert!(channels.get(&Namespace::dashboard()).is_none());
    }

    #[test]
    fn activation_joins_and_forwards_updates() {
        let (channels, connector) = manager();
        let guard = MountGuard::new();
        let (sink, seen) = collecting_sink();

        let attachment = activate_dashboard(Some(&admin()), &guard, &channels, sink).unwrap();
        assert!(guard.is_current(attachment.token));
        assert_eq!(attachment.channel.namespace(), &Namespace::dashboard());

        let mut opened = connector.opened();
        assert_eq!(opened.len(), 1);
        let bridge = &mut opened[0];
        assert_eq!(
            bridge.commands.try_recv().ok(),
            Some(BusMessage::Emit {
                event: events::DASHBOARD_JOIN.into(),
                payload: None
            })
        );

        let rooms = json!({"rooms": []});
        bridge
            .events
            .dispatch(events::DASHBOARD_UPDATE, &[rooms.clone()]);
        assert_eq!(*seen.lock().unwrap(), vec![Some(rooms)]);
    }

    #[test]
    fn leaving_removes_exactly_the_joined_handler() {
        let bus = EventBus::new();
        let other = bus.subscribe(events::DASHBOARD_UPDATE, |_| {});
        let mine = bus.subscribe(events::DASHBOARD_UPDATE, |_| {});

        let mut feed = MockDashboardFeed::new();
        feed.expect_unsubscribe_updates()
            .with(eq(mine))
            .times(1)
            .returning(|_| true);
        feed.expect_unsubscribe_updates().with(eq(other)).never();

        leave_feed(&feed, mine);
    }

    #[test]
    fn deactivation_stops_updates_and_releases_the_channel() {
        let (channels, connector) = manager();
        let guard = MountGuard::new();
        let (sink, seen) = collecting_sink();

        let attachment = activate_dashboard(Some(&admin()), &guard, &channels, sink).unwrap();
        let bus = connector.opened()[0].events.clone();
        assert_eq!(bus.dispatch(events::DASHBOARD_UPDATE, &[json!({"rooms": []})]), 1);

        deactivate_dashboard(Some(&attachment), &guard, &channels);

        assert!(!guard.is_current(attachment.token));
        assert!(attachment.channel.is_closed());
        assert!(channels.get(&Namespace::dashboard()).is_none());
        assert_eq!(bus.dispatch(events::DASHBOARD_UPDATE, &[json!({"rooms": []})]), 0);
        assert_eq!(seen.lock().unwrap().len(), 1);
        assert!(connector.opened()[0].disconnect.try_recv().is_ok());
    }

    #[test]
    fn stats_failures_become_notices() {
        assert_eq!(stats_follow_up(None), StatsFollowUp::Nothing);

        let network = ServiceError::Network("connection refused".into());
        match stats_follow_up(Some(&network)) {
            StatsFollowUp::Notify(message) => {
                assert!(message.starts_with("Loading statistics failed"));
                assert!(message.contains("connection refused"));
            }
            other => panic!("expected a notice, got {:?}", other),
        }

        let rejected = ServiceError::Auth("Unauthorized".into());
        assert_eq!(
            stats_follow_up(Some(&rejected)),
            StatsFollowUp::SignOut(MSG_SESSION_EXPIRED.into())
        );
    }

    #[test]
    fn stale_stats_failure_is_not_reported() {
        let guard = MountGuard::new();
        let token = guard.activate();
        guard.deactivate();

        // The route only asks for a follow-up when the result was applied
        let mut sync = DashboardSync::default();
        assert!(!sync.apply_stats(&guard, token, Err(ServiceError::Network("down".into()))));
        assert_eq!(sync, DashboardSync::default());
    }

    #[test]
    fn deactivation_without_attachment_only_invalidates() {
        let (channels, connector) = manager();
        let guard = MountGuard::new();
        let token = guard.activate();

        deactivate_dashboard(None, &guard, &channels);

        assert!(!guard.is_current(token));
        assert_eq!(connector.open_count(), 0);
    }
}
