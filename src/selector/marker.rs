//! Failure marker shared by filters, strategies and the health checker.

use std::sync::Mutex;
use std::time::{Duration, Instant};

#[derive(Debug, Default, Clone, Copy)]
struct MarkerState {
    count: u64,
    time: Option<Instant>,
}

/// Per-candidate failure state: a failure count and the time of the most
/// recent failure.
///
/// Count and time are updated together under one lock so a health probe and
/// a connection outcome racing on the same candidate never tear the pair.
#[derive(Debug, Default)]
pub struct Marker {
    state: Mutex<MarkerState>,
}

impl Marker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure now.
    pub fn mark(&self) {
        self.mark_at(Instant::now());
    }

    /// Record a failure at the given instant.
    pub fn mark_at(&self, at: Instant) {
        let mut state = self.lock();
        state.count = state.count.saturating_add(1);
        state.time = Some(at);
    }

    /// Clear the failure count after a success.
    pub fn reset(&self) {
        self.lock().count = 0;
    }

    pub fn count(&self) -> u64 {
        self.lock().count
    }

    /// Time of the most recent failure, `None` if the candidate never failed.
    pub fn time(&self) -> Option<Instant> {
        self.lock().time
    }

    /// Consistent `(count, time)` pair.
    pub fn snapshot(&self) -> (u64, Option<Instant>) {
        let state = self.lock();
        (state.count, state.time)
    }

    /// Time elapsed since the last failure. `None` if it never failed.
    pub fn since_last_failure(&self) -> Option<Duration> {
        self.time().map(|t| t.elapsed())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MarkerState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
