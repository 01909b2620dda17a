//! Global statistics panel
//!
//! Renders the one-shot [`StatsSnapshot`]; push updates never touch it.

use chrono::{DateTime, Utc};
use dioxus::prelude::*;

use quizdash_shared::GlobalStats;

use crate::application::dashboard::StatsSnapshot;

/// A 0.0-1.0 fraction as a percentage with one decimal
pub fn format_rate(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

/// Overall accuracy is already a percentage
pub fn format_accuracy(percent: f64) -> String {
    let rounded = (percent * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{}%", rounded as i64)
    } else {
        format!("{:.1}%", rounded)
    }
}

pub fn format_last_updated(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

#[component]
pub fn DashboardStats(snapshot: StatsSnapshot) -> Element {
    match snapshot {
        StatsSnapshot::Pending => rsx! {
            p { class: "stats-loading", "Loading statistics..." }
        },
        StatsSnapshot::Failed(message) => rsx! {
            p { class: "stats-error", "Statistics unavailable: {message}" }
        },
        StatsSnapshot::Loaded(stats) => rsx! {
            StatsPanel { stats }
        },
    }
}

#[component]
fn StatsPanel(stats: GlobalStats) -> Element {
    rsx! {
        section {
            class: "stats-panel",
            div {
                class: "stats-header",
                h2 { "📈 Global statistics" }
                if let Some(at) = stats.last_updated.as_ref() {
                    p { class: "stats-updated", "Last updated: {format_last_updated(at)}" }
                }
            }

            div {
                class: "stats-metrics",
                Metric { label: "Games", value: stats.total_games.to_string() }
                Metric { label: "Players", value: stats.total_players.to_string() }
                Metric { label: "Questions", value: stats.total_questions.to_string() }
                Metric { label: "Accuracy", value: format_accuracy(stats.accuracy) }
            }
            p { class: "stats-played", "🎮 Games played: {stats.games_played}" }

            div {
                class: "stats-rankings",
                div {
                    class: "stats-ranking",
                    h3 { "🏆 Top winners" }
                    ul {
                        if stats.top_winners.is_empty() {
                            li { class: "ranking-empty", "No winners recorded yet." }
                        }
                        for (index, winner) in stats.top_winners.iter().enumerate() {
                            li {
                                key: "{index}",
                                span { "{index + 1}. {winner.name}" }
                                span { "{winner.wins} wins · Rate: {format_rate(winner.win_rate)}" }
                            }
                        }
                    }
                }
                div {
                    class: "stats-ranking",
                    h3 { "📚 Top categories" }
                    ul {
                        if stats.top_categories.is_empty() {
                            li { class: "ranking-empty", "No category data yet." }
                        }
                        for (index, category) in stats.top_categories.iter().enumerate() {
                            li {
                                key: "{index}",
                                span { "{category.category}" }
                                span {
                                    "{category.times_asked} questions · {category.correct_answers} correct · Accuracy: {format_rate(category.accuracy)}"
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn Metric(label: &'static str, value: String) -> Element {
    rsx! {
        div {
            class: "metric",
            p { class: "metric-label", "{label}" }
            p { class: "metric-value", "{value}" }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn rates_use_one_decimal() {
        assert_eq!(format_rate(0.5), "50.0%");
        assert_eq!(format_rate(0.1234), "12.3%");
        assert_eq!(format_rate(0.0), "0.0%");
    }

    #[test]
    fn accuracy_drops_trailing_zero() {
        assert_eq!(format_accuracy(75.0), "75%");
        assert_eq!(format_accuracy(62.54), "62.5%");
    }

    #[test]
    fn last_updated_is_utc() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        assert_eq!(format_last_updated(&at), "2024-05-01 12:30:00 UTC");
    }
}
