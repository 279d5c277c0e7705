//! Dashboard Endpoint
//!
//! - GET /dashboard/metrics - Headline metrics, revenue series and anomalies

use crate::api::client::ApiClient;
use crate::api::dto::DashboardMetrics;
use crate::api::error::ApiResult;

impl ApiClient {
    /// GET /dashboard/metrics
    pub async fn dashboard_metrics(&self) -> ApiResult<DashboardMetrics> {
        self.get("/dashboard/metrics").await
    }
}
