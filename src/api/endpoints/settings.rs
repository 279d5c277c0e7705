//! Settings Endpoints
//!
//! - GET /settings - Current account settings
//! - PUT /settings - Partial update

use crate::api::client::ApiClient;
use crate::api::dto::{MessageResponse, Settings, SettingsUpdate};
use crate::api::error::ApiResult;

impl ApiClient {
    /// GET /settings
    pub async fn settings(&self) -> ApiResult<Settings> {
        self.get("/settings").await
    }

    /// PUT /settings
    pub async fn update_settings(&self, update: &SettingsUpdate) -> ApiResult<MessageResponse> {
        self.put("/settings", update).await
    }
}
