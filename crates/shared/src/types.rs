//! Shared vocabulary types used across REST and push payloads.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Deserialize helper mapping an explicit `null` to `T::default()`.
///
/// Pair with `#[serde(default)]` so that absent fields behave the same.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Identifier as sent by the server.
///
/// The game server is not consistent about identifier types: SQL-backed
/// entities arrive as numbers, socket-scoped ones (player ids, room ids) as
/// strings. Both are accepted and compared structurally.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Number(i64),
    Text(String),
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Number(n) => write!(f, "{}", n),
            EntityId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for EntityId {
    fn from(value: i64) -> Self {
        EntityId::Number(value)
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        EntityId::Text(value.to_string())
    }
}

impl From<String> for EntityId {
    fn from(value: String) -> Self {
        EntityId::Text(value)
    }
}

/// Account role reported by the users API.
///
/// Unknown roles deserialize to `Unknown` for forward compatibility and are
/// never granted dashboard access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Player,
    #[default]
    #[serde(other)]
    Unknown,
}

impl Role {
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Player => "player",
            Role::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of a game room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    #[default]
    Waiting,
    Started,
    Finished,
    /// Unknown status for forward compatibility; rendered like `Waiting`
    #[serde(other)]
    Unknown,
}

impl RoomStatus {
    /// Wire name of the status. `Unknown` reports as waiting.
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomStatus::Started => "started",
            RoomStatus::Finished => "finished",
            RoomStatus::Waiting | RoomStatus::Unknown => "waiting",
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, RoomStatus::Started)
    }
}

impl fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_id_accepts_numbers_and_strings() {
        let ids: Vec<EntityId> = serde_json::from_str(r#"[1, "abc"]"#).unwrap();
        assert_eq!(ids, vec![EntityId::Number(1), EntityId::Text("abc".into())]);
        assert_eq!(ids[0].to_string(), "1");
        assert_eq!(ids[1].to_string(), "abc");
    }

    #[test]
    fn unknown_role_is_not_admin() {
        let role: Role = serde_json::from_str(r#""superuser""#).unwrap();
        assert_eq!(role, Role::Unknown);
        assert!(!role.is_admin());

        let admin: Role = serde_json::from_str(r#""admin""#).unwrap();
        assert!(admin.is_admin());
    }

    #[test]
    fn unknown_room_status_reports_as_waiting() {
        let status: RoomStatus = serde_json::from_str(r#""paused""#).unwrap();
        assert_eq!(status, RoomStatus::Unknown);
        assert_eq!(status.as_str(), "waiting");
        assert!(!status.is_live());
    }
}
