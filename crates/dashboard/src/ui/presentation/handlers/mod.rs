//! Presentation handlers: logic the route components delegate to

pub mod dashboard_lifecycle;

pub use dashboard_lifecycle::{
    activate_dashboard, deactivate_dashboard, stats_follow_up, DashboardAttachment,
    DashboardFeed, StatsFollowUp, UpdateSink,
};
