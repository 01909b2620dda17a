//! Push channel payloads for the admin dashboard.
//!
//! Event payloads arrive as untyped JSON (Socket.IO event arguments). The
//! dashboard must never fail on a bad payload, so decoding reports *why* a
//! payload was rejected and leaves the fallback policy to the caller.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::responses::Room;

/// Event names used on the `/dashboard` namespace
pub mod events {
    /// Client → server: request the current room snapshot (no payload)
    pub const DASHBOARD_JOIN: &str = "dashboard-join";
    /// Server → client: full room snapshot `{rooms: [...]}`
    pub const DASHBOARD_UPDATE: &str = "dashboard-update";
}

/// Payload of `dashboard-update`
///
/// Always a complete snapshot: it replaces prior room state, it is never a
/// diff against it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DashboardUpdate {
    pub rooms: Vec<Room>,
}

/// Reason a `dashboard-update` payload was rejected as a whole
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MalformedUpdate {
    #[error("payload is missing")]
    Missing,
    #[error("payload is not an object")]
    NotAnObject,
    #[error("payload has no `rooms` field")]
    MissingRooms,
    #[error("`rooms` is not a sequence")]
    RoomsNotSequence,
}

/// Room entry left out of an otherwise usable update
#[derive(Debug, Clone, PartialEq, Error)]
#[error("room at index {index} is invalid: {message}")]
pub struct RejectedRoom {
    pub index: usize,
    pub message: String,
}

/// Decoded update plus the entries that could not be read
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DecodedUpdate {
    pub update: DashboardUpdate,
    pub rejected: Vec<RejectedRoom>,
}

impl DashboardUpdate {
    /// Decode the first argument of a `dashboard-update` event.
    ///
    /// Only the envelope can reject the payload. Rooms are decoded one by one
    /// and undecodable entries are reported in [`DecodedUpdate::rejected`].
    pub fn from_payload(payload: Option<&Value>) -> Result<DecodedUpdate, MalformedUpdate> {
        let payload = payload.ok_or(MalformedUpdate::Missing)?;
        let object = payload.as_object().ok_or(MalformedUpdate::NotAnObject)?;
        let entries = object.get("rooms").ok_or(MalformedUpdate::MissingRooms)?;
        let entries = entries.as_array().ok_or(MalformedUpdate::RoomsNotSequence)?;

        let mut decoded = DecodedUpdate::default();
        for (index, entry) in entries.iter().enumerate() {
            match Room::deserialize(entry) {
                Ok(room) => decoded.update.rooms.push(room),
                Err(e) => decoded.rejected.push(RejectedRoom {
                    index,
                    message: e.to_string(),
                }),
            }
        }
        Ok(decoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn r1() -> Value {
        json!({
            "roomId": "R1",
            "status": "started",
            "players": [{"id": 1, "name": "Bob", "connected": true, "eliminated": false, "score": 10}]
        })
    }

    #[test]
    fn decodes_room_snapshot() {
        let decoded = DashboardUpdate::from_payload(Some(&json!({"rooms": [r1()]}))).unwrap();
        let update = decoded.update;
        assert!(decoded.rejected.is_empty());
        assert_eq!(update.rooms.len(), 1);
        assert_eq!(update.rooms[0].players[0].name, "Bob");
        assert_eq!(update.rooms[0].players[0].score(), 10.0);
    }

    #[test]
    fn rejects_payload_shapes() {
        assert_eq!(
            DashboardUpdate::from_payload(None),
            Err(MalformedUpdate::Missing)
        );
        assert_eq!(
            DashboardUpdate::from_payload(Some(&json!("rooms"))),
            Err(MalformedUpdate::NotAnObject)
        );
        assert_eq!(
            DashboardUpdate::from_payload(Some(&json!({}))),
            Err(MalformedUpdate::MissingRooms)
        );
        assert_eq!(
            DashboardUpdate::from_payload(Some(&json!({"rooms": {"R1": {}}}))),
            Err(MalformedUpdate::RoomsNotSequence)
        );
    }

    #[test]
    fn fractional_score_decodes() {
        let mut room = r1();
        room["players"][0]["score"] = json!(10.5);

        let decoded = DashboardUpdate::from_payload(Some(&json!({"rooms": [room]}))).unwrap();
        assert!(decoded.rejected.is_empty());
        assert_eq!(decoded.update.rooms[0].players[0].score(), 10.5);
    }

    #[test]
    fn null_players_and_status_decode_as_defaults() {
        let payload = json!({"rooms": [
            r1(),
            {"roomId": "R2", "status": null, "players": null}
        ]});

        let decoded = DashboardUpdate::from_payload(Some(&payload)).unwrap();
        assert!(decoded.rejected.is_empty());
        assert_eq!(decoded.update.rooms.len(), 2);
        assert!(decoded.update.rooms[1].players.is_empty());
    }

    #[test]
    fn bad_room_is_dropped_and_others_kept() {
        let payload = json!({"rooms": [r1(), {"status": "started"}, "R3"]});

        let decoded = DashboardUpdate::from_payload(Some(&payload)).unwrap();
        assert_eq!(decoded.update.rooms.len(), 1);
        assert_eq!(decoded.update.rooms[0].room_id.to_string(), "R1");

        let indices: Vec<_> = decoded.rejected.iter().map(|r| r.index).collect();
        assert_eq!(indices, [1, 2]);
    }
}
