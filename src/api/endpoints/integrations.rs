//! Integration Endpoints
//!
//! - GET /integrations - Available data sources and their state
//! - POST /integrations/:id/toggle - Connect or disconnect a source

use crate::api::client::{segment, ApiClient};
use crate::api::dto::{Integration, ToggleResponse};
use crate::api::error::ApiResult;

impl ApiClient {
    /// GET /integrations
    pub async fn integrations(&self) -> ApiResult<Vec<Integration>> {
        self.get("/integrations").await
    }

    /// POST /integrations/:id/toggle
    pub async fn toggle_integration(&self, integration_id: &str) -> ApiResult<ToggleResponse> {
        self.post_empty(&format!("/integrations/{}/toggle", segment(integration_id)))
            .await
    }
}
