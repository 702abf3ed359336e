//! Bulk deletion sweep across consultations, logs, team members and chat sessions
//!
//! Stages run strictly in sequence and items within a stage are deleted one
//! at a time. Per-item failures and unreachable listings are logged and
//! skipped. Only a listing whose body breaks the API contract aborts the
//! sweep.

use std::collections::BTreeMap;

use serde::Serialize;
use shared::protocol::{DEFAULT_PROTECTED_EMAIL, PURGE_LOG_FALLBACK_HOURS};
use shared::{ApiError, ConsultApi};
use tracing::{debug, error, info, warn};

use crate::busy::BusyFlag;
use crate::error::PurgeError;
use crate::gate::Confirmed;

/// Resource collection swept by a purge
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PurgeTarget {
    Consultation,
    LogEntry,
    TeamMember,
    ChatSession,
}

impl PurgeTarget {
    /// Fixed stage order
    pub const SWEEP_ORDER: [PurgeTarget; 4] = [
        PurgeTarget::Consultation,
        PurgeTarget::LogEntry,
        PurgeTarget::TeamMember,
        PurgeTarget::ChatSession,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PurgeTarget::Consultation => "consultations",
            PurgeTarget::LogEntry => "logs",
            PurgeTarget::TeamMember => "team members",
            PurgeTarget::ChatSession => "chat sessions",
        }
    }
}

impl std::fmt::Display for PurgeTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Consolidated result of a completed sweep
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PurgeOutcome {
    /// Successful individual deletions across all stages
    pub deleted_count: usize,
    /// Items enumerated across all stages, deleted or not
    pub total_items: usize,
    pub deleted_by_target: BTreeMap<PurgeTarget, usize>,
    /// Failed individual deletions per stage
    pub per_target_errors: BTreeMap<PurgeTarget, usize>,
    /// Roster entries skipped because they match the protected address
    pub exempted: usize,
    /// Count reported by a successful bulk log clear
    pub logs_cleared: Option<u64>,
    /// Whether the log stage had to fall back to counting
    pub log_fallback_used: bool,
}

impl PurgeOutcome {
    pub fn deleted_for(&self, target: PurgeTarget) -> usize {
        self.deleted_by_target.get(&target).copied().unwrap_or(0)
    }

    pub fn errors_for(&self, target: PurgeTarget) -> usize {
        self.per_target_errors.get(&target).copied().unwrap_or(0)
    }

    pub fn failed_count(&self) -> usize {
        self.per_target_errors.values().sum()
    }

    /// Human-readable summary for the success notification
    pub fn summary(&self) -> String {
        format!(
            "Data deletion completed! Deleted {} items successfully. Total items processed: {}",
            self.deleted_count, self.total_items
        )
    }

    fn enumerate(&mut self, count: usize) {
        self.total_items += count;
    }

    fn record_deleted(&mut self, target: PurgeTarget) {
        self.deleted_count += 1;
        *self.deleted_by_target.entry(target).or_insert(0) += 1;
    }

    fn record_failed(&mut self, target: PurgeTarget) {
        *self.per_target_errors.entry(target).or_insert(0) += 1;
    }
}

/// Drives the four-stage purge against a [`ConsultApi`]
pub struct PurgeOrchestrator<'a, A> {
    api: &'a A,
    protected_email: String,
    log_fallback_hours: u32,
    busy: BusyFlag,
}

impl<'a, A: ConsultApi> PurgeOrchestrator<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self {
            api,
            protected_email: DEFAULT_PROTECTED_EMAIL.to_string(),
            log_fallback_hours: PURGE_LOG_FALLBACK_HOURS,
            busy: BusyFlag::new(),
        }
    }

    /// Team member address that is never removed
    pub fn with_protected_email(mut self, email: impl Into<String>) -> Self {
        self.protected_email = email.into();
        self
    }

    pub fn with_log_fallback_hours(mut self, hours: u32) -> Self {
        self.log_fallback_hours = hours;
        self
    }

    /// Share a busy flag with whoever else must see the purge in progress
    pub fn with_busy_flag(mut self, busy: BusyFlag) -> Self {
        self.busy = busy;
        self
    }

    pub fn busy_flag(&self) -> BusyFlag {
        self.busy.clone()
    }

    /// Run the sweep. The busy flag is held for the whole call and released
    /// on every exit path.
    pub async fn purge(&self, _confirmed: Confirmed) -> Result<PurgeOutcome, PurgeError> {
        let _guard = self.busy.try_acquire().ok_or(PurgeError::Busy)?;
        info!("Starting purge of all consultation data");

        let mut outcome = PurgeOutcome::default();
        for stage in PurgeTarget::SWEEP_ORDER {
            let result = match stage {
                PurgeTarget::Consultation => self.sweep_consultations(&mut outcome).await,
                PurgeTarget::LogEntry => self.sweep_logs(&mut outcome).await,
                PurgeTarget::TeamMember => self.sweep_team(&mut outcome).await,
                PurgeTarget::ChatSession => self.sweep_sessions(&mut outcome).await,
            };
            if let Err(source) = result {
                error!("Purge aborted during {} stage: {}", stage, source);
                return Err(PurgeError::Aborted {
                    stage,
                    partial: outcome,
                    source,
                });
            }
        }

        info!(
            deleted = outcome.deleted_count,
            total = outcome.total_items,
            failed = outcome.failed_count(),
            "Purge complete"
        );
        Ok(outcome)
    }

    async fn sweep_consultations(&self, outcome: &mut PurgeOutcome) -> Result<(), ApiError> {
        let target = PurgeTarget::Consultation;
        let Some(consultations) = listing(target, self.api.list_consultations().await)? else {
            return Ok(());
        };
        outcome.enumerate(consultations.len());

        for consultation in &consultations {
            let result = self.api.delete_consultation(&consultation.id).await;
            record(outcome, target, &consultation.id, result);
        }
        Ok(())
    }

    async fn sweep_logs(&self, outcome: &mut PurgeOutcome) -> Result<(), ApiError> {
        let target = PurgeTarget::LogEntry;
        let cleared = match self.api.clear_all_logs().await {
            Ok(resp) if resp.success => Ok(resp),
            Ok(resp) => Err(ApiError::Rejected(resp.message)),
            Err(e) => Err(e),
        };

        match cleared {
            Ok(resp) => {
                info!("All logs cleared ({:?} removed)", resp.logs_removed);
                outcome.logs_cleared = resp.logs_removed;
            }
            Err(e) => {
                warn!("Bulk log clear unavailable, counting logs instead: {}", e);
                outcome.log_fallback_used = true;
                let logs = self.api.recent_logs(self.log_fallback_hours).await;
                if let Some(logs) = listing(target, logs)? {
                    // Logs are not individually deletable; they are only counted.
                    outcome.enumerate(logs.len());
                }
            }
        }
        Ok(())
    }

    async fn sweep_team(&self, outcome: &mut PurgeOutcome) -> Result<(), ApiError> {
        let target = PurgeTarget::TeamMember;
        let Some(members) = listing(target, self.api.list_team().await)? else {
            return Ok(());
        };
        outcome.enumerate(members.len());

        for member in &members {
            if member.email == self.protected_email {
                debug!("Keeping protected team member {}", member.email);
                outcome.exempted += 1;
                continue;
            }
            let result = self.api.remove_team_member(&member.email).await;
            record(outcome, target, &member.email, result);
        }
        Ok(())
    }

    async fn sweep_sessions(&self, outcome: &mut PurgeOutcome) -> Result<(), ApiError> {
        let target = PurgeTarget::ChatSession;
        let Some(sessions) = listing(target, self.api.list_sessions().await)? else {
            return Ok(());
        };
        outcome.enumerate(sessions.len());

        for session in &sessions {
            let result = self.api.delete_session(&session.session_id).await;
            record(outcome, target, &session.session_id, result);
        }
        Ok(())
    }
}

/// Unreachable listings skip the stage; contract violations escape.
fn listing<T>(
    target: PurgeTarget,
    result: Result<Vec<T>, ApiError>,
) -> Result<Option<Vec<T>>, ApiError> {
    match result {
        Ok(items) => {
            debug!("Found {} {}", items.len(), target);
            Ok(Some(items))
        }
        Err(e) if e.is_contract_violation() => Err(e),
        Err(e) => {
            warn!("Could not list {}: {}", target, e);
            Ok(None)
        }
    }
}

fn record(outcome: &mut PurgeOutcome, target: PurgeTarget, id: &str, result: Result<(), ApiError>) {
    match result {
        Ok(()) => {
            debug!("Deleted {} {}", target, id);
            outcome.record_deleted(target);
        }
        Err(e) => {
            warn!("Could not delete {} {}: {}", target, id, e);
            outcome.record_failed(target);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::FakeApi;
    use crate::gate::ConfirmationGate;

    fn confirmed() -> Confirmed {
        let mut gate = ConfirmationGate::new();
        gate.open();
        gate.update("DELETE");
        gate.try_confirm().expect("gate should be armed")
    }

    #[tokio::test]
    async fn partial_consultation_failure() {
        let api = FakeApi::new()
            .with_consultations(&["c1", "c2", "c3"])
            .failing("delete_consultation:c2");

        let outcome = PurgeOrchestrator::new(&api).purge(confirmed()).await.unwrap();

        assert_eq!(outcome.total_items, 3);
        assert_eq!(outcome.deleted_count, 2);
        assert_eq!(outcome.errors_for(PurgeTarget::Consultation), 1);
        assert_eq!(api.remaining_consultations(), vec!["c2".to_string()]);
    }

    #[tokio::test]
    async fn protected_member_is_never_removed() {
        let api = FakeApi::new().with_team(&["ask@akenotech.com", "a@example.com", "b@example.com"]);

        let outcome = PurgeOrchestrator::new(&api).purge(confirmed()).await.unwrap();

        assert_eq!(outcome.deleted_for(PurgeTarget::TeamMember), 2);
        assert_eq!(outcome.exempted, 1);
        assert_eq!(outcome.total_items, 3);
        assert!(!api
            .calls()
            .iter()
            .any(|c| c == "remove_team_member:ask@akenotech.com"));
    }

    #[tokio::test]
    async fn custom_protected_email() {
        let api = FakeApi::new().with_team(&["ask@akenotech.com", "owner@example.com"]);

        let outcome = PurgeOrchestrator::new(&api)
            .with_protected_email("owner@example.com")
            .purge(confirmed())
            .await
            .unwrap();

        assert_eq!(outcome.deleted_for(PurgeTarget::TeamMember), 1);
        assert!(api
            .calls()
            .contains(&"remove_team_member:ask@akenotech.com".to_string()));
        assert!(!api
            .calls()
            .contains(&"remove_team_member:owner@example.com".to_string()));
    }

    #[tokio::test]
    async fn log_clear_failure_falls_back_to_counting() {
        let api = FakeApi::new()
            .with_logs(4)
            .with_consultations(&["c1"])
            .failing("clear_all_logs");

        let outcome = PurgeOrchestrator::new(&api).purge(confirmed()).await.unwrap();

        assert!(outcome.log_fallback_used);
        assert!(api.calls().contains(&"recent_logs:8760".to_string()));
        assert_eq!(outcome.total_items, 5);
        assert_eq!(outcome.deleted_count, 1);
        assert_eq!(outcome.deleted_for(PurgeTarget::LogEntry), 0);
        assert_eq!(outcome.logs_cleared, None);
    }

    #[tokio::test]
    async fn unreachable_log_clear_falls_back() {
        let api = FakeApi::new().with_logs(2).network("clear_all_logs");

        let outcome = PurgeOrchestrator::new(&api).purge(confirmed()).await.unwrap();

        assert!(outcome.log_fallback_used);
        assert!(api.calls().contains(&"recent_logs:8760".to_string()));
        assert_eq!(outcome.total_items, 2);
        assert_eq!(outcome.deleted_count, 0);
    }

    #[tokio::test]
    async fn rejected_log_clear_falls_back() {
        let api = FakeApi::new().with_logs(3).clear_logs_rejected();

        let outcome = PurgeOrchestrator::new(&api).purge(confirmed()).await.unwrap();

        assert!(outcome.log_fallback_used);
        assert!(api.calls().contains(&"recent_logs:8760".to_string()));
        assert_eq!(outcome.total_items, 3);
        assert_eq!(outcome.logs_cleared, None);
    }

    #[tokio::test]
    async fn failed_fallback_listing_contributes_nothing() {
        let api = FakeApi::new()
            .with_logs(5)
            .with_team(&["a@example.com"])
            .with_sessions(&["s1"])
            .failing("clear_all_logs")
            .network("recent_logs");

        let outcome = PurgeOrchestrator::new(&api).purge(confirmed()).await.unwrap();

        assert!(outcome.log_fallback_used);
        assert_eq!(outcome.total_items, 2);
        assert_eq!(outcome.deleted_for(PurgeTarget::TeamMember), 1);
        assert_eq!(outcome.deleted_for(PurgeTarget::ChatSession), 1);
        let calls = api.calls();
        assert!(calls.contains(&"list_team".to_string()));
        assert!(calls.contains(&"delete_session:s1".to_string()));
    }

    #[tokio::test]
    async fn fallback_window_is_configurable() {
        let api = FakeApi::new().with_logs(1).failing("clear_all_logs");

        let outcome = PurgeOrchestrator::new(&api)
            .with_log_fallback_hours(48)
            .purge(confirmed())
            .await
            .unwrap();

        assert!(api.calls().contains(&"recent_logs:48".to_string()));
        assert_eq!(outcome.total_items, 1);
    }

    #[tokio::test]
    async fn shared_busy_flag_blocks_purge() {
        let api = FakeApi::new().with_consultations(&["c1"]);
        let shared = BusyFlag::new();
        let orchestrator = PurgeOrchestrator::new(&api).with_busy_flag(shared.clone());

        let held = shared.try_acquire().unwrap();
        assert!(matches!(
            orchestrator.purge(confirmed()).await,
            Err(PurgeError::Busy)
        ));
        drop(held);

        api.observe_busy(shared.clone());
        orchestrator.purge(confirmed()).await.unwrap();
        assert!(api.busy_samples().iter().all(|b| *b));
        assert!(!shared.is_busy());
    }

    #[tokio::test]
    async fn successful_log_clear_skips_fallback() {
        let api = FakeApi::new().with_logs(7);

        let outcome = PurgeOrchestrator::new(&api).purge(confirmed()).await.unwrap();

        assert!(!outcome.log_fallback_used);
        assert_eq!(outcome.logs_cleared, Some(7));
        assert!(!api.calls().iter().any(|c| c.starts_with("recent_logs")));
        assert_eq!(outcome.total_items, 0);
    }

    #[tokio::test]
    async fn stages_run_in_fixed_order() {
        let api = FakeApi::new()
            .with_consultations(&["c1"])
            .with_team(&["a@example.com"])
            .with_sessions(&["s1"]);

        PurgeOrchestrator::new(&api).purge(confirmed()).await.unwrap();

        assert_eq!(
            api.calls(),
            vec![
                "list_consultations",
                "delete_consultation:c1",
                "clear_all_logs",
                "list_team",
                "remove_team_member:a@example.com",
                "list_sessions",
                "delete_session:s1",
            ]
        );
    }

    #[tokio::test]
    async fn all_deletes_failing_still_proceeds() {
        let api = FakeApi::new()
            .with_sessions(&["s1", "s2"])
            .with_team(&["a@example.com"])
            .failing("remove_team_member:a@example.com")
            .failing("delete_session:s1")
            .failing("delete_session:s2");

        let outcome = PurgeOrchestrator::new(&api).purge(confirmed()).await.unwrap();

        assert_eq!(outcome.deleted_count, 0);
        assert_eq!(outcome.total_items, 3);
        assert_eq!(outcome.errors_for(PurgeTarget::ChatSession), 2);
        assert_eq!(outcome.failed_count(), 3);
    }

    #[tokio::test]
    async fn unreachable_listing_skips_stage() {
        let api = FakeApi::new()
            .with_consultations(&["c1"])
            .with_sessions(&["s1"])
            .failing("list_consultations");

        let outcome = PurgeOrchestrator::new(&api).purge(confirmed()).await.unwrap();

        assert_eq!(outcome.total_items, 1);
        assert_eq!(outcome.deleted_for(PurgeTarget::ChatSession), 1);
        assert_eq!(outcome.deleted_for(PurgeTarget::Consultation), 0);
    }

    #[tokio::test]
    async fn malformed_roster_aborts_and_releases_busy() {
        let api = FakeApi::new()
            .with_consultations(&["c1", "c2"])
            .with_sessions(&["s1"])
            .malformed("list_team");
        let orchestrator = PurgeOrchestrator::new(&api);
        let busy = orchestrator.busy_flag();
        api.observe_busy(busy.clone());

        let err = orchestrator.purge(confirmed()).await.unwrap_err();

        match err {
            PurgeError::Aborted { stage, partial, .. } => {
                assert_eq!(stage, PurgeTarget::TeamMember);
                assert_eq!(partial.deleted_count, 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!busy.is_busy());
        assert!(api.busy_samples().iter().all(|b| *b));
        assert!(!api.calls().contains(&"list_sessions".to_string()));
    }

    #[tokio::test]
    async fn busy_for_whole_purge_then_released() {
        let api = FakeApi::new()
            .with_consultations(&["c1"])
            .with_team(&["a@example.com"])
            .with_sessions(&["s1"]);
        let orchestrator = PurgeOrchestrator::new(&api);
        let busy = orchestrator.busy_flag();
        api.observe_busy(busy.clone());

        orchestrator.purge(confirmed()).await.unwrap();

        let samples = api.busy_samples();
        assert_eq!(samples.len(), api.calls().len());
        assert!(samples.iter().all(|b| *b));
        assert!(!busy.is_busy());
    }

    #[tokio::test]
    async fn reentrant_purge_is_rejected() {
        let api = FakeApi::new().with_consultations(&["c1"]);
        let orchestrator = PurgeOrchestrator::new(&api);
        let held = orchestrator.busy_flag().try_acquire().unwrap();

        let err = orchestrator.purge(confirmed()).await.unwrap_err();

        assert!(matches!(err, PurgeError::Busy));
        assert!(api.calls().is_empty());
        drop(held);
        assert!(orchestrator.purge(confirmed()).await.is_ok());
    }

    #[tokio::test]
    async fn deleted_never_exceeds_total() {
        let api = FakeApi::new()
            .with_consultations(&["c1", "c2"])
            .with_logs(3)
            .with_team(&["ask@akenotech.com", "x@example.com"])
            .with_sessions(&["s1"])
            .failing("clear_all_logs")
            .failing("delete_consultation:c1");

        let outcome = PurgeOrchestrator::new(&api).purge(confirmed()).await.unwrap();

        assert!(outcome.deleted_count <= outcome.total_items);
        assert_eq!(outcome.deleted_count, 3);
        assert_eq!(outcome.total_items, 8);
    }

    #[test]
    fn summary_mentions_counts() {
        let outcome = PurgeOutcome {
            deleted_count: 5,
            total_items: 9,
            ..Default::default()
        };
        let summary = outcome.summary();
        assert!(summary.contains("Deleted 5 items"));
        assert!(summary.contains("Total items processed: 9"));
    }
}
