/// Backend base URL used when nothing else is configured.
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

/// Phrase the operator must type before a full data purge may start.
pub const PURGE_CONFIRMATION_PHRASE: &str = "DELETE";

/// Team member that ships with the backend and must survive a purge.
pub const DEFAULT_PROTECTED_EMAIL: &str = "ask@akenotech.com";

/// Log window (hours) the dashboard shows by default.
pub const DEFAULT_LOG_WINDOW_HOURS: u32 = 24;

/// Log window (hours) used to count logs when the bulk clear is unavailable (one year).
pub const PURGE_LOG_FALLBACK_HOURS: u32 = 8760;

/// Delay before views are reloaded after a purge, giving the backend time to settle.
pub const DEFAULT_REFRESH_DELAY_MS: u64 = 2000;

/// Substring the scheduler puts in its message when a slot was taken meanwhile.
pub const SLOT_TAKEN_MARKER: &str = "no longer available";

/// `status` value list endpoints use to signal success.
pub const STATUS_SUCCESS: &str = "success";
