//! In-memory `ConsultApi` used by the unit tests.
//!
//! Every call is journaled as `op` or `op:arg`. Failures are injected by
//! naming either the exact journal entry or just the op.

use std::collections::HashSet;
use std::sync::Mutex;

use shared::{
    ActionResponse, ApiError, AvailableSlots, ChatRequest, ChatResponse, ChatSessionDetail,
    ChatSessionSummary, ClearLogsResponse, ConsultApi, Consultation, ConsultationStats,
    ConsultationStatus, LogEntry, ScheduleRequest, ScheduleResponse, TeamMember,
};

use crate::busy::BusyFlag;

#[derive(Default)]
pub(crate) struct FakeApi {
    consultations: Mutex<Vec<Consultation>>,
    logs: Mutex<Vec<LogEntry>>,
    team: Mutex<Vec<TeamMember>>,
    sessions: Mutex<Vec<ChatSessionSummary>>,
    slots: Mutex<AvailableSlots>,
    failing: HashSet<String>,
    malformed: HashSet<String>,
    unreachable: HashSet<String>,
    reject_log_clear: bool,
    chat_reply: Option<String>,
    calls: Mutex<Vec<String>>,
    busy: Mutex<Option<BusyFlag>>,
    busy_samples: Mutex<Vec<bool>>,
}

pub(crate) fn consultation(id: &str, status: ConsultationStatus) -> Consultation {
    Consultation {
        id: id.to_string(),
        name: format!("Client {id}"),
        email: format!("{id}@example.com"),
        phone: String::new(),
        company: String::new(),
        preferred_date: "2025-01-15".to_string(),
        preferred_time: "10:00 AM".to_string(),
        timezone: Some("EST".to_string()),
        message: String::new(),
        status,
        created_at: "2025-01-10T09:00:00".to_string(),
        confirmed_at: None,
    }
}

fn log_entry(n: usize) -> LogEntry {
    LogEntry {
        id: format!("log-{n}"),
        action: "scheduled".to_string(),
        consultation_id: format!("c{n}"),
        user_name: "Client".to_string(),
        user_email: "client@example.com".to_string(),
        user_phone: String::new(),
        company: String::new(),
        status: if n % 2 == 0 { "pending" } else { "confirmed" }.to_string(),
        timestamp: "2025-01-10T09:00:00".to_string(),
    }
}

fn member(email: &str) -> TeamMember {
    TeamMember {
        name: "Member".to_string(),
        email: email.to_string(),
        role: "Sales".to_string(),
        phone: String::new(),
    }
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_consultations(self, ids: &[&str]) -> Self {
        self.consultations.lock().unwrap().extend(
            ids.iter()
                .map(|id| consultation(id, ConsultationStatus::Pending)),
        );
        self
    }

    pub fn with_logs(self, count: usize) -> Self {
        self.logs.lock().unwrap().extend((0..count).map(log_entry));
        self
    }

    pub fn with_team(self, emails: &[&str]) -> Self {
        self.team
            .lock()
            .unwrap()
            .extend(emails.iter().map(|e| member(e)));
        self
    }

    pub fn with_sessions(self, ids: &[&str]) -> Self {
        self.sessions
            .lock()
            .unwrap()
            .extend(ids.iter().map(|id| ChatSessionSummary {
                session_id: id.to_string(),
                created_at: None,
                message_count: 2,
            }));
        self
    }

    pub fn with_slots(self, slots: AvailableSlots) -> Self {
        *self.slots.lock().unwrap() = slots;
        self
    }

    /// Calls matching `key` answer with a server error
    pub fn failing(mut self, key: &str) -> Self {
        self.failing.insert(key.to_string());
        self
    }

    /// Calls matching `key` answer with a body that does not parse
    pub fn malformed(mut self, key: &str) -> Self {
        self.malformed.insert(key.to_string());
        self
    }

    /// Calls matching `key` never reach the server
    pub fn network(mut self, key: &str) -> Self {
        self.unreachable.insert(key.to_string());
        self
    }

    /// The bulk log clear answers 2xx with `success: false`
    pub fn clear_logs_rejected(mut self) -> Self {
        self.reject_log_clear = true;
        self
    }

    /// Fixed assistant reply instead of echoing the message
    pub fn with_chat_reply(mut self, reply: &str) -> Self {
        self.chat_reply = Some(reply.to_string());
        self
    }

    /// Sample `busy` on every call
    pub fn observe_busy(&self, busy: BusyFlag) {
        *self.busy.lock().unwrap() = Some(busy);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn busy_samples(&self) -> Vec<bool> {
        self.busy_samples.lock().unwrap().clone()
    }

    pub fn remaining_consultations(&self) -> Vec<String> {
        self.consultations
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.id.clone())
            .collect()
    }

    fn call(&self, entry: String) -> Result<(), ApiError> {
        if let Some(busy) = self.busy.lock().unwrap().as_ref() {
            self.busy_samples.lock().unwrap().push(busy.is_busy());
        }
        let op = entry.split(':').next().unwrap_or_default().to_string();
        self.calls.lock().unwrap().push(entry.clone());

        if self.unreachable.contains(&entry) || self.unreachable.contains(&op) {
            return Err(ApiError::Network(format!("{entry}: connection refused")));
        }
        if self.malformed.contains(&entry) || self.malformed.contains(&op) {
            return Err(ApiError::Parse(format!("{entry}: unexpected body")));
        }
        if self.failing.contains(&entry) || self.failing.contains(&op) {
            return Err(ApiError::Server {
                status: 500,
                message: format!("{entry} failed"),
            });
        }
        Ok(())
    }
}

impl ConsultApi for FakeApi {
    async fn stats(&self) -> Result<ConsultationStats, ApiError> {
        self.call("stats".into())?;
        let consultations = self.consultations.lock().unwrap();
        let count = |s: ConsultationStatus| consultations.iter().filter(|c| c.status == s).count() as u64;
        Ok(ConsultationStats {
            total_requests: consultations.len() as u64,
            pending_requests: count(ConsultationStatus::Pending),
            confirmed_requests: count(ConsultationStatus::Confirmed),
            completed_requests: count(ConsultationStatus::Completed),
            cancelled_requests: count(ConsultationStatus::Cancelled),
            recent_requests_7_days: 0,
            team_members_count: self.team.lock().unwrap().len() as u64,
        })
    }

    async fn recent_logs(&self, hours: u32) -> Result<Vec<LogEntry>, ApiError> {
        self.call(format!("recent_logs:{hours}"))?;
        Ok(self.logs.lock().unwrap().clone())
    }

    async fn logs_by_status(&self, status: &str) -> Result<Vec<LogEntry>, ApiError> {
        self.call(format!("logs_by_status:{status}"))?;
        Ok(self
            .logs
            .lock()
            .unwrap()
            .iter()
            .filter(|l| l.status == status)
            .cloned()
            .collect())
    }

    async fn logs_by_date_range(&self, start: &str, end: &str) -> Result<Vec<LogEntry>, ApiError> {
        self.call(format!("logs_by_date_range:{start}..{end}"))?;
        Ok(self.logs.lock().unwrap().clone())
    }

    async fn clear_all_logs(&self) -> Result<ClearLogsResponse, ApiError> {
        self.call("clear_all_logs".into())?;
        if self.reject_log_clear {
            return Ok(ClearLogsResponse {
                success: false,
                message: "Log clearing is disabled".to_string(),
                logs_removed: None,
            });
        }
        let mut logs = self.logs.lock().unwrap();
        let removed = logs.len() as u64;
        logs.clear();
        Ok(ClearLogsResponse {
            success: true,
            message: format!("{removed} logs removed"),
            logs_removed: Some(removed),
        })
    }

    async fn list_consultations(&self) -> Result<Vec<Consultation>, ApiError> {
        self.call("list_consultations".into())?;
        Ok(self.consultations.lock().unwrap().clone())
    }

    async fn update_consultation_status(
        &self,
        id: &str,
        status: &ConsultationStatus,
    ) -> Result<ActionResponse, ApiError> {
        self.call(format!("update_consultation_status:{id}"))?;
        let mut consultations = self.consultations.lock().unwrap();
        match consultations.iter_mut().find(|c| c.id == id) {
            Some(c) => {
                c.status = status.clone();
                Ok(ActionResponse {
                    success: true,
                    message: format!("Consultation {id} updated"),
                })
            }
            None => Err(ApiError::NotFound(id.to_string())),
        }
    }

    async fn delete_consultation(&self, id: &str) -> Result<(), ApiError> {
        self.call(format!("delete_consultation:{id}"))?;
        self.consultations.lock().unwrap().retain(|c| c.id != id);
        Ok(())
    }

    async fn list_team(&self) -> Result<Vec<TeamMember>, ApiError> {
        self.call("list_team".into())?;
        Ok(self.team.lock().unwrap().clone())
    }

    async fn add_team_member(&self, member: &TeamMember) -> Result<ActionResponse, ApiError> {
        self.call(format!("add_team_member:{}", member.email))?;
        self.team.lock().unwrap().push(member.clone());
        Ok(ActionResponse {
            success: true,
            message: format!("Team member {} added successfully", member.name),
        })
    }

    async fn remove_team_member(&self, email: &str) -> Result<(), ApiError> {
        self.call(format!("remove_team_member:{email}"))?;
        self.team.lock().unwrap().retain(|m| m.email != email);
        Ok(())
    }

    async fn list_sessions(&self) -> Result<Vec<ChatSessionSummary>, ApiError> {
        self.call("list_sessions".into())?;
        Ok(self.sessions.lock().unwrap().clone())
    }

    async fn get_session(&self, id: &str) -> Result<ChatSessionDetail, ApiError> {
        self.call(format!("get_session:{id}"))?;
        Err(ApiError::NotFound(id.to_string()))
    }

    async fn delete_session(&self, id: &str) -> Result<(), ApiError> {
        self.call(format!("delete_session:{id}"))?;
        self.sessions.lock().unwrap().retain(|s| s.session_id != id);
        Ok(())
    }

    async fn available_slots(&self) -> Result<AvailableSlots, ApiError> {
        self.call("available_slots".into())?;
        Ok(self.slots.lock().unwrap().clone())
    }

    async fn schedule_consultation(
        &self,
        req: &ScheduleRequest,
    ) -> Result<ScheduleResponse, ApiError> {
        self.call(format!(
            "schedule_consultation:{} {}",
            req.preferred_date, req.preferred_time
        ))?;
        Ok(ScheduleResponse {
            success: true,
            message: "Consultation request created successfully!".to_string(),
            consultation_id: Some("abcd1234".to_string()),
            next_steps: None,
            suggestion: None,
        })
    }

    async fn chat(&self, req: &ChatRequest) -> Result<ChatResponse, ApiError> {
        let session_id = req
            .session_id
            .clone()
            .unwrap_or_else(|| "server_assigned".to_string());
        self.call(format!("chat:{session_id}"))?;
        Ok(ChatResponse {
            response: self
                .chat_reply
                .clone()
                .unwrap_or_else(|| format!("echo: {}", req.message)),
            session_id,
            sources: None,
            confidence: None,
            processing_time: None,
        })
    }
}
