//! Error types for admin-ops

use crate::purge::{PurgeOutcome, PurgeTarget};
use shared::ApiError;

/// Errors that end a purge before it produces an outcome
#[derive(Debug, thiserror::Error)]
pub enum PurgeError {
    #[error("A purge is already in progress")]
    Busy,

    #[error("Purge aborted during {stage} stage: {source}")]
    Aborted {
        stage: PurgeTarget,
        /// Counters accumulated before the abort. Diagnostic only.
        partial: PurgeOutcome,
        #[source]
        source: ApiError,
    },
}

/// Errors from the consultation slot picker
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SlotError {
    #[error("Select a date first")]
    NoDateSelected,

    #[error("No open slots on {0}")]
    DateUnavailable(String),

    #[error("{time} is not available on {date}")]
    TimeUnavailable { date: String, time: String },

    #[error("Both a date and a time must be selected")]
    Incomplete,
}
