//! Live room card
//!
//! Header with id and status, the player list, the current question and the
//! partial results in the order the server sent them.

use dioxus::prelude::*;

use quizdash_shared::{Room, RoomStatus};

use super::player_list::PlayerList;

pub const NO_QUESTION_TEXT: &str = "Waiting for question...";

/// Status dot and css modifier for the badge
pub fn status_badge(status: RoomStatus) -> (&'static str, &'static str) {
    match status {
        RoomStatus::Started => ("🟢", "status-started"),
        RoomStatus::Finished => ("🔴", "status-finished"),
        RoomStatus::Waiting | RoomStatus::Unknown => ("🟡", "status-waiting"),
    }
}

/// Medal for the position in the partial results
pub fn rank_icon(index: usize) -> &'static str {
    match index {
        0 => "🥇",
        1 => "🥈",
        2 => "🥉",
        _ => "👤",
    }
}

pub fn question_line(room: &Room) -> &str {
    room.question_text().unwrap_or(NO_QUESTION_TEXT)
}

#[component]
pub fn RoomCard(room: Room) -> Element {
    let (dot, badge_class) = status_badge(room.status);
    let question = question_line(&room).to_string();

    rsx! {
        div {
            class: "room-card",
            div {
                class: "room-header",
                h3 { "🎮 {room.room_id}" }
                span { class: "status-badge {badge_class}", "{dot} {room.status}" }
            }

            PlayerList { players: room.players.clone() }

            div {
                class: "room-question",
                p { class: "room-question-label", "📖 Current question:" }
                p { class: "room-question-text", "{question}" }
            }

            if !room.players.is_empty() {
                div {
                    class: "room-results",
                    h4 { "📊 Partial results" }
                    for (index, player) in room.players.iter().enumerate() {
                        div {
                            key: "{player.id}",
                            class: "result-row rank-{index.min(3)}",
                            span { "{rank_icon(index)} {player.name}" }
                            span {
                                "{player.score()} pts "
                                if player.eliminated { "❌" } else { "✅" }
                            }
                        }
                    }
                }
            }
        }
    }
}
