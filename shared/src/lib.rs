use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// Protocol constants shared by every consumer of the consultation backend
pub mod protocol;

// API client types and trait
pub mod api;
pub use api::{ApiClientConfig, ApiError, ConsultApi};

/// Lifecycle state of a consultation request.
///
/// The backend stores status as a free-form string; anything outside the
/// four known states is preserved in `Other` so it round-trips untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ConsultationStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
    Other(String),
}

impl ConsultationStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ConsultationStatus::Pending => "pending",
            ConsultationStatus::Confirmed => "confirmed",
            ConsultationStatus::Completed => "completed",
            ConsultationStatus::Cancelled => "cancelled",
            ConsultationStatus::Other(s) => s,
        }
    }
}

impl From<String> for ConsultationStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "pending" => ConsultationStatus::Pending,
            "confirmed" => ConsultationStatus::Confirmed,
            "completed" => ConsultationStatus::Completed,
            "cancelled" => ConsultationStatus::Cancelled,
            _ => ConsultationStatus::Other(s),
        }
    }
}

impl From<ConsultationStatus> for String {
    fn from(status: ConsultationStatus) -> Self {
        status.as_str().to_string()
    }
}

impl std::fmt::Display for ConsultationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ConsultationStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ConsultationStatus::from(s.to_string()))
    }
}

/// A consultation request as returned by `/consultation/all`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Consultation {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub preferred_date: String,
    #[serde(default)]
    pub preferred_time: String,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub message: String,
    pub status: ConsultationStatus,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub confirmed_at: Option<String>,
}

/// An audit log entry recorded whenever a consultation changes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    #[serde(default)]
    pub id: String,
    pub action: String,
    #[serde(default)]
    pub consultation_id: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub user_email: String,
    #[serde(default)]
    pub user_phone: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub status: String,
    pub timestamp: String,
}

/// A team member notified about new consultations.
///
/// The email doubles as the member's identifier on the backend. It is
/// treated as an opaque string: no format validation is applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    pub name: String,
    pub email: String,
    pub role: String,
    #[serde(default)]
    pub phone: String,
}

/// Summary row from `/sessions`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSessionSummary {
    pub session_id: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub message_count: u64,
}

/// Full session history from `/sessions/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSessionDetail {
    pub session_id: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub message_count: u64,
    #[serde(default)]
    pub messages: Vec<ChatTurn>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: String,
    pub content: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Aggregate counters from `/admin/stats`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsultationStats {
    #[serde(default)]
    pub total_requests: u64,
    #[serde(default)]
    pub pending_requests: u64,
    #[serde(default)]
    pub confirmed_requests: u64,
    #[serde(default)]
    pub completed_requests: u64,
    #[serde(default)]
    pub cancelled_requests: u64,
    #[serde(default)]
    pub recent_requests_7_days: u64,
    #[serde(default)]
    pub team_members_count: u64,
}

/// Bookable consultation slots from `/consultation/available-slots`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AvailableSlots {
    /// Days (`YYYY-MM-DD`) that still have at least one open time, in server order
    #[serde(default)]
    pub available_days: Vec<String>,
    /// Every time of day the schedule offers, regardless of bookings
    #[serde(default)]
    pub available_times: Vec<String>,
    /// Open times for each day
    #[serde(default)]
    pub available_slots_by_day: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub timezone: Option<String>,
}

/// Body for `POST /consultation/schedule`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub company: String,
    pub preferred_date: String,
    pub preferred_time: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub consultation_id: Option<String>,
    #[serde(default)]
    pub next_steps: Option<String>,
    #[serde(default)]
    pub suggestion: Option<String>,
}

impl ScheduleResponse {
    /// True when the backend refused the booking because someone else took the slot
    pub fn is_slot_conflict(&self) -> bool {
        !self.success && self.message.contains(protocol::SLOT_TAKEN_MARKER)
    }
}

/// Body for `POST /chat`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    pub session_id: String,
    #[serde(default)]
    pub sources: Option<Vec<BTreeMap<String, String>>>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub processing_time: Option<f64>,
}

/// Generic `{success, message}` answer from mutating admin endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

/// Answer from `POST /admin/clear-all-logs`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClearLogsResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub logs_removed: Option<u64>,
}
