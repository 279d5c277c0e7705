//! Chat Endpoints
//!
//! - POST /chat/message - Ask the AI analyst a question
//! - GET /chat/history/:session_id - Messages of one conversation
//! - GET /chat/sessions - Recent conversations

use crate::api::client::{segment, ApiClient};
use crate::api::dto::{
    ChatHistoryResponse, ChatMessage, ChatReply, ChatRequest, ChatSession, ChatSessionsResponse,
};
use crate::api::error::ApiResult;

impl ApiClient {
    /// POST /chat/message
    ///
    /// Pass `None` as `session_id` to start a new conversation; the reply
    /// carries the id to continue it.
    pub async fn send_chat_message(
        &self,
        message: &str,
        session_id: Option<&str>,
    ) -> ApiResult<ChatReply> {
        self.post("/chat/message", &ChatRequest { message, session_id })
            .await
    }

    /// GET /chat/history/:session_id
    pub async fn chat_history(&self, session_id: &str) -> ApiResult<Vec<ChatMessage>> {
        let response: ChatHistoryResponse = self
            .get(&format!("/chat/history/{}", segment(session_id)))
            .await?;
        Ok(response.messages)
    }

    /// GET /chat/sessions
    pub async fn chat_sessions(&self) -> ApiResult<Vec<ChatSession>> {
        let response: ChatSessionsResponse = self.get("/chat/sessions").await?;
        Ok(response.sessions)
    }
}
