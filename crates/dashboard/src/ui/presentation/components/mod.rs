//! Presentational components

pub mod connection_indicator;
pub mod dashboard_stats;
pub mod notice_modal;
pub mod player_list;
pub mod room_card;

pub use connection_indicator::ConnectionIndicator;
pub use dashboard_stats::DashboardStats;
pub use notice_modal::NoticeModal;
pub use player_list::PlayerList;
pub use room_card::RoomCard;
