//! Cooperative cancellation.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A shareable flag asking a running search to stop.
///
/// Clones share the same flag, and can be handed to other threads (a
/// watchdog, a UI) while the search runs.  The search polls it each
/// time it enters a new level, unwinds whatever it has open, and
/// returns the solutions found so far.
///
/// The flag stays set until [`StopHandle::clear`] is called, so a stop
/// requested before a solve starts is honored by that solve.
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    flag: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn new() -> StopHandle {
        StopHandle::default()
    }

    /// Asks the search to stop.  Idempotent.
    pub fn request_stop(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_stop_requested(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    /// Re-arms the flag for another solve.
    pub fn clear(&self) {
        self.flag.store(false, Ordering::Relaxed);
    }
}
