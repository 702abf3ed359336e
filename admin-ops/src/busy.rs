use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Busy state of the control that triggers a purge.
///
/// Clones share the same flag, so the UI can watch it while the
/// orchestrator holds a [`BusyGuard`].
#[derive(Debug, Clone, Default)]
pub struct BusyFlag {
    inner: Arc<AtomicBool>,
}

impl BusyFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.inner.load(Ordering::SeqCst)
    }

    /// Mark busy and return a guard that clears the flag when dropped.
    /// Returns `None` if the flag is already held.
    pub fn try_acquire(&self) -> Option<BusyGuard> {
        self.inner
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| BusyGuard {
                inner: Arc::clone(&self.inner),
            })
    }
}

/// Releases the busy flag on drop, whichever way the holder exits.
#[derive(Debug)]
pub struct BusyGuard {
    inner: Arc<AtomicBool>,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.inner.store(false, Ordering::SeqCst);
    }
}
