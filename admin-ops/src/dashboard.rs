//! Admin dashboard data loading
//!
//! The dashboard has four independent sections. A failure in one is kept as
//! an error message for that section and never hides the others.

use serde::Serialize;
use shared::protocol::DEFAULT_LOG_WINDOW_HOURS;
use shared::{ApiError, ConsultApi, Consultation, ConsultationStats, LogEntry, TeamMember};
use tracing::{debug, warn};

/// A loaded section, or the error message to show in its place
pub type Section<T> = Result<T, String>;

/// Which logs the dashboard shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogFilter {
    /// Logs from the last `hours`
    Recent { hours: u32 },
    /// Logs in a given status; replaces the time window
    Status(String),
}

impl Default for LogFilter {
    fn default() -> Self {
        LogFilter::Recent {
            hours: DEFAULT_LOG_WINDOW_HOURS,
        }
    }
}

impl LogFilter {
    /// A non-empty status wins over the hour window
    pub fn from_parts(hours: u32, status: Option<&str>) -> Self {
        match status.map(str::trim) {
            Some(s) if !s.is_empty() => LogFilter::Status(s.to_string()),
            _ => LogFilter::Recent { hours },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub stats: Section<ConsultationStats>,
    pub logs: Section<Vec<LogEntry>>,
    pub team: Section<Vec<TeamMember>>,
    pub consultations: Section<Vec<Consultation>>,
}

impl DashboardSnapshot {
    pub fn is_complete(&self) -> bool {
        self.stats.is_ok() && self.logs.is_ok() && self.team.is_ok() && self.consultations.is_ok()
    }
}

pub async fn load_logs<A: ConsultApi>(api: &A, filter: &LogFilter) -> Result<Vec<LogEntry>, ApiError> {
    match filter {
        LogFilter::Recent { hours } => api.recent_logs(*hours).await,
        LogFilter::Status(status) => api.logs_by_status(status).await,
    }
}

/// Load every section in order: stats, logs, team, consultations
pub async fn load_snapshot<A: ConsultApi>(api: &A, filter: &LogFilter) -> DashboardSnapshot {
    let stats = section("stats", api.stats().await);
    let logs = section("logs", load_logs(api, filter).await);
    let team = section("team", api.list_team().await);
    let consultations = section("consultations", api.list_consultations().await);

    DashboardSnapshot {
        stats,
        logs,
        team,
        consultations,
    }
}

fn section<T>(name: &str, result: Result<T, ApiError>) -> Section<T> {
    match result {
        Ok(value) => {
            debug!("Loaded {} section", name);
            Ok(value)
        }
        Err(e) => {
            warn!("Error loading {}: {}", name, e);
            Err(e.to_string())
        }
    }
}
