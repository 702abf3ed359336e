//! Admin operations for the consultation backend
//!
//! Everything in here is generic over [`shared::ConsultApi`], so the same
//! logic drives the native CLI and runs against in-memory fakes in tests.
//!
//! # Overview
//!
//! The library provides:
//! - `ConfirmationGate` - typed-phrase check that must pass before a purge
//! - `BusyFlag` - scoped busy state that blocks re-entrant purges
//! - `PurgeOrchestrator` - four-stage best-effort deletion sweep
//! - `DashboardSnapshot` - stats, logs, team and consultations in one load
//! - `SlotPicker` - date/time cross-filtering for consultation booking
//! - `ChatController` - session-scoped chat message forwarding
//!
//! # Example
//!
//! ```ignore
//! use admin_ops::{ConfirmationGate, GateKey, PurgeOrchestrator};
//!
//! let mut gate = ConfirmationGate::new();
//! gate.open();
//! gate.update("DELETE");
//! if let Some(confirmed) = gate.handle_key(GateKey::Enter) {
//!     let outcome = PurgeOrchestrator::new(&client).purge(confirmed).await?;
//!     println!("{}", outcome.summary());
//! }
//! ```

pub mod busy;
pub mod chat;
pub mod dashboard;
pub mod error;
pub mod gate;
pub mod purge;
pub mod slots;

#[cfg(test)]
pub(crate) mod fake;

pub use busy::{BusyFlag, BusyGuard};
pub use chat::{is_schedule_intent, new_session_id, ChatController, ChatOutcome, SCHEDULE_COMMAND};
pub use dashboard::{load_logs, load_snapshot, DashboardSnapshot, LogFilter, Section};
pub use error::{PurgeError, SlotError};
pub use gate::{ConfirmationGate, Confirmed, GateKey, InputState};
pub use purge::{PurgeOrchestrator, PurgeOutcome, PurgeTarget};
pub use slots::{ContactDetails, DateOption, SlotPicker, TimeOption};
