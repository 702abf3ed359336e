//! API client types and trait definitions
//!
//! This module defines the contract of the consultation backend so it can be
//! implemented by the native (reqwest) client and by in-memory fakes in tests.

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub use crate::{
    ActionResponse, AvailableSlots, ChatRequest, ChatResponse, ChatSessionDetail,
    ChatSessionSummary, ClearLogsResponse, Consultation, ConsultationStats, ConsultationStatus,
    LogEntry, ScheduleRequest, ScheduleResponse, TeamMember,
};
use crate::protocol::STATUS_SUCCESS;

/// API error types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ApiError {
    /// Network or connection error
    Network(String),
    /// The request did not complete within the configured timeout
    Timeout(String),
    /// Server returned an error status
    Server { status: u16, message: String },
    /// Failed to parse response
    Parse(String),
    /// Resource not found
    NotFound(String),
    /// Server answered 2xx but reported failure in the body
    Rejected(String),
}

impl ApiError {
    /// True when the response body did not match the documented contract
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, ApiError::Parse(_))
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Network(msg) => write!(f, "Network error: {}", msg),
            ApiError::Timeout(msg) => write!(f, "Request timed out: {}", msg),
            ApiError::Server { status, message } => {
                write!(f, "Server error ({}): {}", status, message)
            }
            ApiError::Parse(msg) => write!(f, "Parse error: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Rejected(msg) => write!(f, "Rejected by server: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

/// Check the `status` field list endpoints wrap their payload with
pub fn ensure_success(status: &str) -> Result<(), ApiError> {
    if status == STATUS_SUCCESS {
        Ok(())
    } else {
        Err(ApiError::Rejected(format!("status was {:?}", status)))
    }
}

/// Check the `success` flag of a mutating endpoint's answer
pub fn ensure_action(resp: ActionResponse) -> Result<ActionResponse, ApiError> {
    if resp.success {
        Ok(resp)
    } else {
        Err(ApiError::Rejected(resp.message))
    }
}

/// `{status, requests}` from `/consultation/all`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsultationsEnvelope {
    pub status: String,
    #[serde(default)]
    pub requests: Vec<Consultation>,
}

/// `{status, logs}` from the `/admin/logs/*` family
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogsEnvelope {
    pub status: String,
    #[serde(default)]
    pub logs: Vec<LogEntry>,
}

/// `{status, team_members}` from `/admin/team`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamEnvelope {
    pub status: String,
    #[serde(default)]
    pub team_members: Vec<TeamMember>,
}

/// `{status, stats}` from `/admin/stats`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsEnvelope {
    pub status: String,
    #[serde(default)]
    pub stats: ConsultationStats,
}

/// `{status, available_slots}` from `/consultation/available-slots`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotsEnvelope {
    pub status: String,
    #[serde(default)]
    pub available_slots: AvailableSlots,
}

/// `{sessions}` from `/sessions` (no status field on this one)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionsEnvelope {
    #[serde(default)]
    pub sessions: Vec<ChatSessionSummary>,
}

/// API endpoint definitions
pub mod endpoints {
    use urlencoding::encode;

    pub const ADMIN_STATS: &str = "/admin/stats";
    pub const ADMIN_TEAM: &str = "/admin/team";
    pub const CLEAR_ALL_LOGS: &str = "/admin/clear-all-logs";
    pub const CONSULTATIONS: &str = "/consultation/all";
    pub const AVAILABLE_SLOTS: &str = "/consultation/available-slots";
    pub const SCHEDULE: &str = "/consultation/schedule";
    pub const SESSIONS: &str = "/sessions";
    pub const CHAT: &str = "/chat";

    pub fn recent_logs(hours: u32) -> String {
        format!("/admin/logs/recent?hours={}", hours)
    }

    pub fn logs_by_status(status: &str) -> String {
        format!("/admin/logs/status/{}", encode(status))
    }

    pub fn logs_by_date_range(start: &str, end: &str) -> String {
        format!(
            "/admin/logs/date-range?start_date={}&end_date={}",
            encode(start),
            encode(end)
        )
    }

    pub fn update_consultation_status(id: &str, status: &str) -> String {
        format!(
            "/consultation/update-status/{}?status={}",
            encode(id),
            encode(status)
        )
    }

    pub fn delete_consultation(id: &str) -> String {
        format!("/consultation/delete/{}", encode(id))
    }

    pub fn add_team_member(name: &str, email: &str, role: &str, phone: &str) -> String {
        format!(
            "/admin/team/add?name={}&email={}&role={}&phone={}",
            encode(name),
            encode(email),
            encode(role),
            encode(phone)
        )
    }

    pub fn remove_team_member(email: &str) -> String {
        format!("/admin/team/remove/{}", encode(email))
    }

    pub fn session(id: &str) -> String {
        format!("/sessions/{}", encode(id))
    }
}

/// Trait defining the consultation backend API
///
/// All methods are async and return `Result<T, ApiError>`. List methods have
/// already unwrapped the `{status, ...}` envelope; a non-success status
/// surfaces as `ApiError::Rejected`.
#[allow(async_fn_in_trait)]
pub trait ConsultApi {
    /// Aggregate consultation counters
    async fn stats(&self) -> Result<ConsultationStats, ApiError>;

    /// Logs recorded within the last `hours`
    async fn recent_logs(&self, hours: u32) -> Result<Vec<LogEntry>, ApiError>;

    /// Logs whose consultation is in `status`
    async fn logs_by_status(&self, status: &str) -> Result<Vec<LogEntry>, ApiError>;

    /// Logs between two `YYYY-MM-DD` dates, inclusive
    async fn logs_by_date_range(&self, start: &str, end: &str)
        -> Result<Vec<LogEntry>, ApiError>;

    /// Remove every log entry in one call
    async fn clear_all_logs(&self) -> Result<ClearLogsResponse, ApiError>;

    /// Every consultation request
    async fn list_consultations(&self) -> Result<Vec<Consultation>, ApiError>;

    async fn update_consultation_status(
        &self,
        id: &str,
        status: &ConsultationStatus,
    ) -> Result<ActionResponse, ApiError>;

    async fn delete_consultation(&self, id: &str) -> Result<(), ApiError>;

    /// The notification roster
    async fn list_team(&self) -> Result<Vec<TeamMember>, ApiError>;

    async fn add_team_member(&self, member: &TeamMember) -> Result<ActionResponse, ApiError>;

    async fn remove_team_member(&self, email: &str) -> Result<(), ApiError>;

    /// Active chat sessions
    async fn list_sessions(&self) -> Result<Vec<ChatSessionSummary>, ApiError>;

    async fn get_session(&self, id: &str) -> Result<ChatSessionDetail, ApiError>;

    async fn delete_session(&self, id: &str) -> Result<(), ApiError>;

    /// Open booking slots
    async fn available_slots(&self) -> Result<AvailableSlots, ApiError>;

    /// Book a consultation. A refused booking is returned, not raised, so the
    /// caller can inspect the message.
    async fn schedule_consultation(
        &self,
        req: &ScheduleRequest,
    ) -> Result<ScheduleResponse, ApiError>;

    /// Send one chat message
    async fn chat(&self, req: &ChatRequest) -> Result<ChatResponse, ApiError>;
}

/// Configuration for creating an API client
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// Base URL of the backend (e.g., "http://localhost:8000")
    pub base_url: String,
    /// Per-request timeout; `None` keeps the transport default
    pub timeout: Option<Duration>,
}

impl ApiClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }
}
