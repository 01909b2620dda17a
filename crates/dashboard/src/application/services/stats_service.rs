//! Stats Service - dashboard statistics endpoints

use quizdash_shared::{DashboardSummary, GlobalStats};

use crate::application::error::ServiceError;
use crate::ports::outbound::ApiPort;

/// Read-only access to the aggregate statistics
#[derive(Clone)]
pub struct StatsService<A: ApiPort> {
    api: A,
}

impl<A: ApiPort> StatsService<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    /// One snapshot of the global statistics
    pub async fn fetch_global_stats(&self) -> Result<GlobalStats, ServiceError> {
        let stats = self.api.get("/api/dashboard/stats").await?;
        Ok(stats)
    }

    pub async fn fetch_summary(&self) -> Result<DashboardSummary, ServiceError> {
        let summary = self.api.get("/api/dashboard/summary").await?;
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use serde_json::json;

    use crate::application::Api;
    use crate::ports::outbound::{ApiError, MockRawApiPort};

    #[tokio::test]
    async fn fetches_stats_snapshot() {
        let mut raw = MockRawApiPort::new();
        raw.expect_get_json()
            .withf(|path| path == "/api/dashboard/stats")
            .times(1)
            .returning(|_| Ok(json!({"gamesPlayed": 4, "accuracy": 62.5})));

        let stats = StatsService::new(Api::new(Arc::new(raw)))
            .fetch_global_stats()
            .await
            .unwrap();
        assert_eq!(stats.games_played, 4);
        assert_eq!(stats.accuracy, 62.5);
    }

    #[tokio::test]
    async fn transport_failure_is_a_network_error() {
        let mut raw = MockRawApiPort::new();
        raw.expect_get_json()
            .returning(|_| Err(ApiError::RequestFailed("connection refused".into())));

        let err = StatsService::new(Api::new(Arc::new(raw)))
            .fetch_global_stats()
            .await
            .unwrap_err();
        assert_eq!(err, ServiceError::Network("connection refused".into()));
    }

    #[tokio::test]
    async fn summary_keeps_free_form_counters() {
        let mut raw = MockRawApiPort::new();
        raw.expect_get_json()
            .withf(|path| path == "/api/dashboard/summary")
            .returning(|_| Ok(json!({"activeRooms": 2})));

        let summary = StatsService::new(Api::new(Arc::new(raw)))
            .fetch_summary()
            .await
            .unwrap();
        assert_eq!(summary.0["activeRooms"], json!(2));
    }
}
