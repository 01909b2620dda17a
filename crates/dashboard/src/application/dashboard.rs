//! Dashboard render state
//!
//! Two sources with different freshness feed the dashboard:
//! - [`LiveRooms`]: every `dashboard-update` replaces the whole room list
//!   (last update wins, never merged).
//! - [`StatsSnapshot`]: fetched once per mount and never refreshed by push
//!   events.
//!
//! [`MountGuard`] ties async results to the mount that started them so that a
//! response arriving after the view went away is dropped.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use serde_json::Value;

use quizdash_shared::{DashboardUpdate, DecodedUpdate, GlobalStats, Room};

use crate::application::error::ServiceError;

/// What happened to a push payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Rooms replaced; `dropped` entries did not decode and were left out
    Replaced { dropped: usize },
    /// Envelope did not decode; rooms cleared
    Malformed,
    /// Arrived after the view was deactivated
    Stale,
}

/// Rooms as last reported by the push channel
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LiveRooms {
    rooms: Vec<Room>,
}

impl LiveRooms {
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Apply the first argument of a `dashboard-update` event.
    ///
    /// A payload without a `rooms` sequence shows as "no active rooms". Single
    /// rooms that do not decode are skipped.
    pub fn apply_payload(&mut self, payload: Option<&Value>) -> UpdateOutcome {
        match DashboardUpdate::from_payload(payload) {
            Ok(DecodedUpdate { update, rejected }) => {
                for room in &rejected {
                    tracing::warn!(
                        target: "quizdash::diagnostics",
                        event = "dropped_dashboard_room",
                        index = room.index,
                        reason = %room.message,
                        "Skipping undecodable room"
                    );
                }
                tracing::debug!(
                    rooms = update.rooms.len(),
                    dropped = rejected.len(),
                    "Dashboard update applied"
                );
                self.rooms = update.rooms;
                UpdateOutcome::Replaced {
                    dropped: rejected.len(),
                }
            }
            Err(reason) => {
                tracing::warn!(
                    target: "quizdash::diagnostics",
                    event = "malformed_dashboard_update",
                    %reason,
                    "Dropping malformed dashboard update"
                );
                self.rooms.clear();
                UpdateOutcome::Malformed
            }
        }
    }
}

/// Statistics fetched once per mount
#[derive(Debug, Clone, PartialEq, Default)]
pub enum StatsSnapshot {
    #[default]
    Pending,
    Loaded(GlobalStats),
    Failed(String),
}

impl StatsSnapshot {
    /// Settle a pending snapshot. Returns false when it was already settled.
    pub fn fulfill(&mut self, result: Result<GlobalStats, ServiceError>) -> bool {
        if !matches!(self, StatsSnapshot::Pending) {
            tracing::debug!("Statistics already settled, ignoring result");
            return false;
        }
        *self = match result {
            Ok(stats) => StatsSnapshot::Loaded(stats),
            Err(e) => {
                tracing::warn!("Statistics fetch failed: {}", e);
                StatsSnapshot::Failed(e.to_string())
            }
        };
        true
    }

    pub fn stats(&self) -> Option<&GlobalStats> {
        match self {
            StatsSnapshot::Loaded(stats) => Some(stats),
            _ => None,
        }
    }
}

/// Generation of one dashboard mount
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MountToken(u64);

/// Tracks whether the mount that issued a request is still the current one
#[derive(Debug, Clone, Default)]
pub struct MountGuard {
    generation: Arc<AtomicU64>,
    active: Arc<AtomicBool>,
}

impl MountGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new mount, invalidating tokens of earlier ones
    pub fn activate(&self) -> MountToken {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.active.store(true, Ordering::SeqCst);
        MountToken(generation)
    }

    pub fn deactivate(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.active.store(false, Ordering::SeqCst);
    }

    pub fn is_current(&self, token: MountToken) -> bool {
        self.active.load(Ordering::SeqCst) && self.generation.load(Ordering::SeqCst) == token.0
    }
}

/// Everything the dashboard renders besides the session
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashboardSync {
    pub rooms: LiveRooms,
    pub stats: StatsSnapshot,
}

impl DashboardSync {
    pub fn apply_room_update(
        &mut self,
        guard: &MountGuard,
        token: MountToken,
        payload: Option<&Value>,
    ) -> UpdateOutcome {
        if !guard.is_current(token) {
            return UpdateOutcome::Stale;
        }
        self.rooms.apply_payload(payload)
    }

    /// Returns whether the result was taken
    pub fn apply_stats(
        &mut self,
        guard: &MountGuard,
        token: MountToken,
        result: Result<GlobalStats, ServiceError>,
    ) -> bool {
        if !guard.is_current(token) {
            tracing::debug!("Dropping statistics for an inactive dashboard");
            return false;
        }
        self.stats.fulfill(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizdash_shared::RoomStatus;
    use serde_json::json;

    fn r1() -> Value {
        json!({"rooms": [{
            "roomId": "R1",
            "status": "started",
            "players": [{"id": 1, "name": "Bob", "connected": true, "eliminated": false, "score": 10}]
        }]})
    }

    fn r2() -> Value {
        json!({"rooms": [{"roomId": "R2", "status": "waiting", "players": []}]})
    }

    #[test]
    fn scenario_update_renders_single_room() {
        let mut rooms = LiveRooms::default();
        assert_eq!(
            rooms.apply_payload(Some(&r1())),
            UpdateOutcome::Replaced { dropped: 0 }
        );

        let room = &rooms.rooms()[0];
        assert_eq!(room.status, RoomStatus::Started);
        assert_eq!(room.players[0].name, "Bob");
        assert_eq!(room.players[0].score(), 10.0);
    }

    #[test]
    fn last_update_wins() {
        let mut rooms = LiveRooms::default();
        rooms.apply_payload(Some(&r1()));
        rooms.apply_payload(Some(&r2()));

        assert_eq!(rooms.rooms().len(), 1);
        assert_eq!(rooms.rooms()[0].room_id.to_string(), "R2");
    }

    #[test]
    fn malformed_payloads_clear_rooms() {
        let malformed = [
            None,
            Some(json!(null)),
            Some(json!({})),
            Some(json!({"rooms": "R1"})),
            Some(json!({"rooms": null})),
        ];
        for payload in malformed {
            let mut rooms = LiveRooms::default();
            rooms.apply_payload(Some(&r1()));
            assert_eq!(rooms.apply_payload(payload.as_ref()), UpdateOutcome::Malformed);
            assert!(rooms.is_empty());
        }
    }

    #[test]
    fn one_bad_room_does_not_hide_the_others() {
        let mut rooms = LiveRooms::default();
        let payload = json!({"rooms": [
            {"roomId": "R1", "status": "started", "players": [{"id": 1, "name": "Bob", "score": 10.5}]},
            {"roomId": "R2", "status": null, "players": null},
            {"players": []}
        ]});

        assert_eq!(
            rooms.apply_payload(Some(&payload)),
            UpdateOutcome::Replaced { dropped: 1 }
        );
        assert_eq!(rooms.rooms().len(), 2);
        assert_eq!(rooms.rooms()[0].players[0].score(), 10.5);
        assert_eq!(rooms.rooms()[1].status, RoomStatus::Waiting);
        assert!(rooms.rooms()[1].players.is_empty());
    }

    #[test]
    fn stats_survive_room_updates() {
        let guard = MountGuard::new();
        let token = guard.activate();
        let mut sync = DashboardSync::default();

        let stats = GlobalStats {
            total_games: 9,
            ..GlobalStats::default()
        };
        assert!(sync.apply_stats(&guard, token, Ok(stats.clone())));
        for _ in 0..3 {
            sync.apply_room_update(&guard, token, Some(&r1()));
            sync.apply_room_update(&guard, token, Some(&json!("garbage")));
        }

        assert_eq!(sync.stats.stats(), Some(&stats));
    }

    #[test]
    fn stats_are_settled_once() {
        let mut snapshot = StatsSnapshot::default();
        assert!(snapshot.fulfill(Err(ServiceError::Network("down".into()))));
        assert!(!snapshot.fulfill(Ok(GlobalStats::default())));
        assert!(matches!(snapshot, StatsSnapshot::Failed(_)));
    }

    #[test]
    fn late_results_after_deactivation_are_ignored() {
        let guard = MountGuard::new();
        let token = guard.activate();
        let mut sync = DashboardSync::default();

        guard.deactivate();
        assert!(!sync.apply_stats(&guard, token, Ok(GlobalStats::default())));
        assert_eq!(
            sync.apply_room_update(&guard, token, Some(&r1())),
            UpdateOutcome::Stale
        );
        assert_eq!(sync, DashboardSync::default());
    }

    #[test]
    fn remount_invalidates_old_token() {
        let guard = MountGuard::new();
        let first = guard.activate();
        guard.deactivate();
        let second = guard.activate();

        assert!(!guard.is_current(first));
        assert!(guard.is_current(second));
    }
}
