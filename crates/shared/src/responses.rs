//! Response types returned by the REST API and carried by push events.
//!
//! Every struct here decodes leniently: the server routinely omits fields
//! (zero counters, empty lists, unanswered questions) or sends them as
//! `null`, so such values fall back to their defaults.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::types::{null_as_default, EntityId, Role, RoomStatus};

// =============================================================================
// Users
// =============================================================================

/// User returned by login and registration.
///
/// `token` and `expires_at` are only present when the server issues bearer
/// credentials; older servers return the bare user record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedUser {
    #[serde(default, alias = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Expiry of `token` as unix seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
}

/// User record from `GET /api/users` and `GET /api/users/:id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserData {
    #[serde(alias = "_id")]
    pub id: EntityId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Role,
}

// =============================================================================
// Questions
// =============================================================================

/// Question sampled from `GET /api/questions/random`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionData {
    #[serde(default, alias = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(default)]
    pub category: String,
    #[serde(alias = "question")]
    pub text: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
}

// =============================================================================
// Statistics
// =============================================================================

/// Global statistics snapshot from `GET /api/dashboard/stats`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GlobalStats {
    pub games_played: u64,
    pub total_games: u64,
    pub total_players: u64,
    pub total_questions: u64,
    pub total_correct_answers: u64,
    /// Overall accuracy as a percentage (0-100)
    pub accuracy: f64,
    pub top_winners: Vec<TopWinner>,
    pub top_categories: Vec<TopCategory>,
    #[serde(deserialize_with = "lenient_timestamp")]
    pub last_updated: Option<DateTime<Utc>>,
}

/// Read a timestamp the way the server happens to send it.
///
/// Accepts RFC 3339 / RFC 2822 strings, `YYYY-MM-DD HH:MM:SS` (taken as UTC),
/// bare dates and epoch milliseconds. Anything else yields `None`.
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    let parsed = match value {
        Value::Null => return None,
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|millis| millis.trunc() as i64))
            .and_then(DateTime::from_timestamp_millis),
        Value::String(s) => parse_timestamp_str(s.trim()),
        _ => None,
    };
    if parsed.is_none() {
        tracing::warn!(%value, "Ignoring unreadable timestamp");
    }
    parsed
}

fn parse_timestamp_str(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(at) = DateTime::parse_from_rfc3339(s) {
        return Some(at.with_timezone(&Utc));
    }
    if let Ok(at) = DateTime::parse_from_rfc2822(s) {
        return Some(at.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(parse_timestamp))
}

/// Entry of the "top winners" ranking
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TopWinner {
    #[serde(alias = "playerName")]
    pub name: String,
    pub wins: u64,
    /// Fraction of games won (0.0-1.0)
    pub win_rate: f64,
}

/// Entry of the "top categories" ranking
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TopCategory {
    pub category: String,
    pub times_asked: u64,
    pub correct_answers: u64,
    /// Fraction of correct answers (0.0-1.0)
    pub accuracy: f64,
}

/// Free-form counters from `GET /api/dashboard/summary`
///
/// The summary endpoint has no fixed schema; keys are displayed as-is in
/// server order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DashboardSummary(pub serde_json::Map<String, serde_json::Value>);

impl DashboardSummary {
    /// Iterate over entries rendered as display strings
    pub fn entries(&self) -> impl Iterator<Item = (&str, String)> {
        self.0.iter().map(|(key, value)| {
            let shown = match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (key.as_str(), shown)
        })
    }
}

// =============================================================================
// Rooms (push channel)
// =============================================================================

/// One active or finished game room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub room_id: EntityId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: RoomStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub players: Vec<PlayerData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_question: Option<CurrentQuestion>,
}

impl Room {
    /// Text of the question being asked, if any
    pub fn question_text(&self) -> Option<&str> {
        self.current_question
            .as_ref()
            .map(|q| q.text.as_str())
            .filter(|text| !text.is_empty())
    }
}

/// Player inside a room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerData {
    pub id: EntityId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub connected: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub eliminated: bool,
    /// Any JSON number; games with partial credit send fractions
    #[serde(default)]
    pub score: Option<f64>,
}

impl PlayerData {
    /// Score with absent values shown as zero.
    ///
    /// Whole scores display without a decimal point (`10`, not `10.0`).
    pub fn score(&self) -> f64 {
        self.score.unwrap_or(0.0)
    }
}

/// Question currently shown in a room
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CurrentQuestion {
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn login_response_without_id_decodes() {
        let user: AuthenticatedUser =
            serde_json::from_value(json!({"role": "admin", "name": "A"})).unwrap();
        assert_eq!(user.name, "A");
        assert!(user.role.is_admin());
        assert!(user.id.is_none());
        assert!(user.token.is_none());
    }

    #[test]
    fn global_stats_fills_missing_fields() {
        let stats: GlobalStats = serde_json::from_value(json!({
            "totalGames": 12,
            "topWinners": [{"playerName": "Ana", "wins": 3, "winRate": 0.5}]
        }))
        .unwrap();

        assert_eq!(stats.total_games, 12);
        assert_eq!(stats.total_players, 0);
        assert_eq!(stats.top_winners[0].name, "Ana");
        assert!(stats.top_categories.is_empty());
        assert!(stats.last_updated.is_none());
    }

    #[test]
    fn room_with_null_score_and_no_question() {
        let room: Room = serde_json::from_value(json!({
            "roomId": "R1",
            "status": "started",
            "players": [{"id": 1, "name": "Bob", "connected": true, "eliminated": false, "score": null}]
        }))
        .unwrap();

        assert_eq!(room.players[0].score(), 0.0);
        assert_eq!(room.players[0].score().to_string(), "0");
        assert_eq!(room.question_text(), None);
        assert!(room.status.is_live());
    }

    #[test]
    fn room_with_null_fields_uses_defaults() {
        let room: Room = serde_json::from_value(json!({
            "roomId": "R2",
            "status": null,
            "players": null,
            "currentQuestion": {"text": null}
        }))
        .unwrap();

        assert_eq!(room.status, RoomStatus::Waiting);
        assert!(room.players.is_empty());
        assert_eq!(room.question_text(), None);
    }

    #[test]
    fn fractional_scores_are_kept() {
        let player: PlayerData = serde_json::from_value(json!({
            "id": "p1",
            "name": null,
            "connected": null,
            "score": 10.5
        }))
        .unwrap();

        assert_eq!(player.score(), 10.5);
        assert_eq!(player.score().to_string(), "10.5");
        assert_eq!(player.name, "");
        assert!(!player.connected);

        let whole: PlayerData = serde_json::from_value(json!({"id": 1, "score": 10})).unwrap();
        assert_eq!(whole.score().to_string(), "10");
    }

    #[test]
    fn last_updated_accepts_common_shapes() {
        let expected = DateTime::parse_from_rfc3339("2025-03-01T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);

        for shape in [
            json!("2025-03-01T10:00:00.000Z"),
            json!("2025-03-01 10:00:00"),
            json!("Sat, 01 Mar 2025 10:00:00 +0000"),
            json!(1740823200000_i64),
        ] {
            let stats: GlobalStats =
                serde_json::from_value(json!({"totalGames": 3, "lastUpdated": shape})).unwrap();
            assert_eq!(stats.last_updated, Some(expected), "shape {}", shape);
            assert_eq!(stats.total_games, 3);
        }

        let day = parse_timestamp(&json!("2025-03-01")).unwrap();
        assert_eq!(day.to_rfc3339(), "2025-03-01T00:00:00+00:00");
    }

    #[test]
    fn unreadable_last_updated_keeps_counters() {
        for shape in [json!("yesterday"), json!(true), json!({"at": 1}), json!(null)] {
            let stats: GlobalStats =
                serde_json::from_value(json!({"totalGames": 3, "lastUpdated": shape})).unwrap();
            assert_eq!(stats.total_games, 3);
            assert!(stats.last_updated.is_none());
        }
    }

    #[test]
    fn summary_entries_render_strings_unquoted() {
        let summary: DashboardSummary =
            serde_json::from_value(json!({"activeRooms": 2, "status": "ok"})).unwrap();
        let entries: Vec<_> = summary.entries().collect();
        assert!(entries.contains(&("activeRooms", "2".to_string())));
        assert!(entries.contains(&("status", "ok".to_string())));
    }
}
