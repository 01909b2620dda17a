//! Player list inside a room card

use dioxus::prelude::*;

use quizdash_shared::PlayerData;

/// Connection dot of a player
pub fn connection_dot(player: &PlayerData) -> &'static str {
    if player.connected {
        "🟢"
    } else {
        "🔴"
    }
}

/// Elimination label of a player
pub fn standing_label(player: &PlayerData) -> &'static str {
    if player.eliminated {
        "❌ Eliminated"
    } else {
        "✅ Active"
    }
}

#[component]
pub fn PlayerList(players: Vec<PlayerData>) -> Element {
    if players.is_empty() {
        return rsx! {
            p { class: "player-list-empty", "No players in this room." }
        };
    }

    rsx! {
        ul {
            class: "player-list",
            for player in players.iter() {
                li {
                    key: "{player.id}",
                    class: "player-row",
                    span { "{player.name} {connection_dot(player)}" }
                    span { "{standing_label(player)} | 🏆 {player.score()}" }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizdash_shared::EntityId;

    fn player(connected: bool, eliminated: bool) -> PlayerData {
        PlayerData {
            id: EntityId::Number(1),
            name: "Bob".into(),
            connected,
            eliminated,
            score: None,
        }
    }

    #[test]
    fn connected_player_gets_green_dot() {
        assert_eq!(connection_dot(&player(true, false)), "🟢");
        assert_eq!(connection_dot(&player(false, false)), "🔴");
    }

    #[test]
    fn eliminated_players_are_labelled() {
        assert_eq!(standing_label(&player(true, true)), "❌ Eliminated");
        assert_eq!(standing_label(&player(true, false)), "✅ Active");
    }
}
