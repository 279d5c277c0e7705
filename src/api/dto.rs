//! Data Transfer Objects
//!
//! Request and response types for the Datalyn API.
//! These types are serialized/deserialized to/from JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================
// AUTH DTOs
// ============================================

/// Signed-in user as returned by the identity endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// Login request body
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Signup request body
#[derive(Debug, Serialize)]
pub struct SignupRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub name: &'a str,
}

/// Token and user issued by login and signup
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

// ============================================
// DASHBOARD DTOs
// ============================================

/// Headline business metrics for the dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardMetrics {
    pub mrr: f64,
    pub mrr_change: f64,
    pub active_users: u64,
    pub active_users_change: f64,
    pub conversions: u64,
    pub conversions_change: f64,
    pub churn_rate: f64,
    pub churn_rate_change: f64,
    #[serde(default)]
    pub chart_data: Vec<RevenuePoint>,
    #[serde(default)]
    pub anomalies: Vec<Anomaly>,
}

/// One point of the revenue series
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevenuePoint {
    pub date: String,
    pub revenue: f64,
}

/// Severity of a detected anomaly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnomalyKind {
    Positive,
    Warning,
    Critical,
    #[serde(other)]
    Info,
}

/// An anomaly surfaced by the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Anomaly {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: AnomalyKind,
    pub title: String,
    pub description: String,
    /// Human-readable age, e.g. "2 hours ago"
    pub timestamp: String,
}

// ============================================
// CHAT DTOs
// ============================================

/// Question for the AI analyst
#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub message: &'a str,
    /// `None` starts a new conversation
    pub session_id: Option<&'a str>,
}

/// One step of the analyst's reasoning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReasoningStep {
    pub step: u32,
    pub title: String,
    pub description: String,
}

/// A chat message (either side of the conversation)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(default)]
    pub id: Option<String>,
    pub role: String,
    pub content: String,
    #[serde(default)]
    pub reasoning_steps: Option<Vec<ReasoningStep>>,
    /// ISO 8601 timestamp as sent by the backend
    #[serde(default)]
    pub created_at: Option<String>,
}

impl ChatMessage {
    /// Parsed creation time, if present and well-formed
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }

    pub fn is_assistant(&self) -> bool {
        self.role == "assistant"
    }
}

/// Reply to a chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub session_id: String,
    pub message: ChatMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatHistoryResponse {
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

/// Summary of a past conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSession {
    pub session_id: String,
    pub preview: String,
    pub last_updated: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatSessionsResponse {
    #[serde(default)]
    pub sessions: Vec<ChatSession>,
}

// ============================================
// SETTINGS DTOs
// ============================================

/// How often reports are emailed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportSchedule {
    Daily,
    Weekly,
    Monthly,
}

impl std::str::FromStr for ReportSchedule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(ReportSchedule::Daily),
            "weekly" => Ok(ReportSchedule::Weekly),
            "monthly" => Ok(ReportSchedule::Monthly),
            other => Err(format!(
                "Invalid report schedule: {}. Use: daily, weekly, monthly",
                other
            )),
        }
    }
}

impl std::fmt::Display for ReportSchedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ReportSchedule::Daily => "daily",
            ReportSchedule::Weekly => "weekly",
            ReportSchedule::Monthly => "monthly",
        };
        f.write_str(s)
    }
}

/// Account settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub name: String,
    pub email: String,
    #[serde(default = "default_email_notifications")]
    pub email_notifications: bool,
    #[serde(default = "default_report_schedule")]
    pub report_schedule: ReportSchedule,
}

fn default_email_notifications() -> bool {
    true
}

fn default_report_schedule() -> ReportSchedule {
    ReportSchedule::Weekly
}

/// Partial settings update; unset fields are left unchanged
#[derive(Debug, Clone, Default, Serialize)]
pub struct SettingsUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_notifications: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_schedule: Option<ReportSchedule>,
}

impl SettingsUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email_notifications.is_none() && self.report_schedule.is_none()
    }
}

/// Acknowledgement message from mutating endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

// ============================================
// INTEGRATION DTOs
// ============================================

/// A third-party data source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Integration {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub icon: String,
    pub connected: bool,
}

/// Result of toggling an integration
#[derive(Debug, Clone, Deserialize)]
pub struct ToggleResponse {
    pub message: String,
    pub connected: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_me_response_ignores_extra_fields() {
        let body = r#"{
            "id": "7b1c", "email": "a@b.com", "name": "A",
            "created_at": "2026-01-01T00:00:00+00:00",
            "email_notifications": true, "report_schedule": "weekly"
        }"#;
        let user: User = serde_json::from_str(body).unwrap();
        assert_eq!(user.email, "a@b.com");
    }

    #[test]
    fn test_anomaly_kind() {
        let body = r#"{"id": "3", "type": "critical", "title": "Churn spike",
                       "description": "3 accounts", "timestamp": "1 day ago"}"#;
        let anomaly: Anomaly = serde_json::from_str(body).unwrap();
        assert_eq!(anomaly.kind, AnomalyKind::Critical);

        let unknown: AnomalyKind = serde_json::from_str(r#""notice""#).unwrap();
        assert_eq!(unknown, AnomalyKind::Info);
    }

    #[test]
    fn test_chat_request_new_session_sends_null() {
        let req = ChatRequest {
            message: "Why did MRR drop?",
            session_id: None,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert!(json["session_id"].is_null());
    }

    #[test]
    fn test_chat_message_timestamp() {
        let msg = ChatMessage {
            id: None,
            role: "assistant".to_string(),
            content: "MRR grew".to_string(),
            reasoning_steps: None,
            created_at: Some("2026-03-02T10:15:00.123456+00:00".to_string()),
        };
        let ts = msg.created_at().unwrap();
        assert_eq!(ts.format("%Y-%m-%d %H:%M").to_string(), "2026-03-02 10:15");
        assert!(msg.is_assistant());
    }

    #[test]
    fn test_settings_update_skips_unset() {
        let update = SettingsUpdate {
            report_schedule: Some(ReportSchedule::Monthly),
            ..Default::default()
        };
        let json = serde_json::to_string(&update).unwrap();
        assert_eq!(json, r#"{"report_schedule":"monthly"}"#);
        assert!(SettingsUpdate::default().is_empty());
    }

    #[test]
    fn test_report_schedule_parse() {
        assert_eq!("Weekly".parse::<ReportSchedule>(), Ok(ReportSchedule::Weekly));
        assert!("hourly".parse::<ReportSchedule>().is_err());
    }
}
