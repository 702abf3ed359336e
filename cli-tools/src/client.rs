//! Native HTTP client implementation using reqwest

use anyhow::Context;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use shared::api::{
    endpoints, ensure_action, ensure_success, ApiClientConfig, ApiError, ConsultApi,
    ConsultationsEnvelope, LogsEnvelope, SessionsEnvelope, SlotsEnvelope, StatsEnvelope,
    TeamEnvelope,
};
use shared::{
    ActionResponse, AvailableSlots, ChatRequest, ChatResponse, ChatSessionDetail,
    ChatSessionSummary, ClearLogsResponse, Consultation, ConsultationStats, ConsultationStatus,
    LogEntry, ScheduleRequest, ScheduleResponse, TeamMember,
};
use tracing::debug;

/// Native API client using reqwest
pub struct NativeApiClient {
    client: Client,
    config: ApiClientConfig,
}

impl NativeApiClient {
    pub fn new(config: ApiClientConfig) -> anyhow::Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to create HTTP client")?;
        Ok(Self { client, config })
    }

    async fn send(&self, req: RequestBuilder) -> Result<Response, ApiError> {
        req.send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout(e.to_string())
            } else {
                ApiError::Network(e.to_string())
            }
        })
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        let url = self.config.url(endpoint);
        debug!("GET {}", url);
        let response = self.send(self.client.get(&url)).await?;
        self.handle_response(response).await
    }

    async fn error_for_status(&self, response: Response) -> Result<Response, ApiError> {
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound("Resource not found".to_string()));
        }

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ApiError::Server {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: Response,
    ) -> Result<T, ApiError> {
        self.error_for_status(response)
            .await?
            .json::<T>()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }

    /// For endpoints where any 2xx is success and the body is ignored
    async fn expect_ok(&self, req: RequestBuilder) -> Result<(), ApiError> {
        let response = self.send(req).await?;
        self.error_for_status(response).await.map(|_| ())
    }
}

impl ConsultApi for NativeApiClient {
    async fn stats(&self) -> Result<ConsultationStats, ApiError> {
        let env: StatsEnvelope = self.get(endpoints::ADMIN_STATS).await?;
        ensure_success(&env.status)?;
        Ok(env.stats)
    }

    async fn recent_logs(&self, hours: u32) -> Result<Vec<LogEntry>, ApiError> {
        let env: LogsEnvelope = self.get(&endpoints::recent_logs(hours)).await?;
        ensure_success(&env.status)?;
        Ok(env.logs)
    }

    async fn logs_by_status(&self, status: &str) -> Result<Vec<LogEntry>, ApiError> {
        let env: LogsEnvelope = self.get(&endpoints::logs_by_status(status)).await?;
        ensure_success(&env.status)?;
        Ok(env.logs)
    }

    async fn logs_by_date_range(&self, start: &str, end: &str) -> Result<Vec<LogEntry>, ApiError> {
        let env: LogsEnvelope = self
            .get(&endpoints::logs_by_date_range(start, end))
            .await?;
        ensure_success(&env.status)?;
        Ok(env.logs)
    }

    async fn clear_all_logs(&self) -> Result<ClearLogsResponse, ApiError> {
        let url = self.config.url(endpoints::CLEAR_ALL_LOGS);
        debug!("POST {}", url);
        let response = self.send(self.client.post(&url)).await?;
        self.handle_response(response).await
    }

    async fn list_consultations(&self) -> Result<Vec<Consultation>, ApiError> {
        let env: ConsultationsEnvelope = self.get(endpoints::CONSULTATIONS).await?;
        ensure_success(&env.status)?;
        Ok(env.requests)
    }

    async fn update_consultation_status(
        &self,
        id: &str,
        status: &ConsultationStatus,
    ) -> Result<ActionResponse, ApiError> {
        let url = self
            .config
            .url(&endpoints::update_consultation_status(id, status.as_str()));
        debug!("PUT {}", url);
        let response = self.send(self.client.put(&url)).await?;
        ensure_action(self.handle_response(response).await?)
    }

    async fn delete_consultation(&self, id: &str) -> Result<(), ApiError> {
        let url = self.config.url(&endpoints::delete_consultation(id));
        debug!("DELETE {}", url);
        self.expect_ok(self.client.delete(&url)).await
    }

    async fn list_team(&self) -> Result<Vec<TeamMember>, ApiError> {
        let env: TeamEnvelope = self.get(endpoints::ADMIN_TEAM).await?;
        ensure_success(&env.status)?;
        Ok(env.team_members)
    }

    async fn add_team_member(&self, member: &TeamMember) -> Result<ActionResponse, ApiError> {
        let url = self.config.url(&endpoints::add_team_member(
            &member.name,
            &member.email,
            &member.role,
            &member.phone,
        ));
        debug!("POST {}", url);
        let response = self.send(self.client.post(&url)).await?;
        ensure_action(self.handle_response(response).await?)
    }

    async fn remove_team_member(&self, email: &str) -> Result<(), ApiError> {
        let url = self.config.url(&endpoints::remove_team_member(email));
        debug!("DELETE {}", url);
        self.expect_ok(self.client.delete(&url)).await
    }

    async fn list_sessions(&self) -> Result<Vec<ChatSessionSummary>, ApiError> {
        let env: SessionsEnvelope = self.get(endpoints::SESSIONS).await?;
        Ok(env.sessions)
    }

    async fn get_session(&self, id: &str) -> Result<ChatSessionDetail, ApiError> {
        self.get(&endpoints::session(id)).await
    }

    async fn delete_session(&self, id: &str) -> Result<(), ApiError> {
        let url = self.config.url(&endpoints::session(id));
        debug!("DELETE {}", url);
        self.expect_ok(self.client.delete(&url)).await
    }

    async fn available_slots(&self) -> Result<AvailableSlots, ApiError> {
        let env: SlotsEnvelope = self.get(endpoints::AVAILABLE_SLOTS).await?;
        ensure_success(&env.status)?;
        Ok(env.available_slots)
    }

    async fn schedule_consultation(
        &self,
        req: &ScheduleRequest,
    ) -> Result<ScheduleResponse, ApiError> {
        let url = self.config.url(endpoints::SCHEDULE);
        debug!("POST {}", url);
        let request = self
            .client
            .post(&url)
            .header("Accept", "application/json")
            .json(req);
        let response = self.send(request).await?;
        self.handle_response(response).await
    }

    async fn chat(&self, req: &ChatRequest) -> Result<ChatResponse, ApiError> {
        let url = self.config.url(endpoints::CHAT);
        debug!("POST {}", url);
        let response = self.send(self.client.post(&url).json(req)).await?;
        self.handle_response(response).await
    }
}
