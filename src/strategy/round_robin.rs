//! Round-robin selection strategy.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::selector::{SelectContext, Strategy};

/// Round-robin selector.
/// Stores an internal counter to rotate through candidates.
#[derive(Debug, Default)]
pub struct RoundRobin {
    counter: AtomicU64,
}

impl RoundRobin {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<T: Clone + Send + Sync> Strategy<T> for RoundRobin {
    fn apply(&self, _ctx: &SelectContext, candidates: &[T]) -> Option<T> {
        if candidates.is_empty() {
            return None;
        }

        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        let index = (n % candidates.len() as u64) as usize;
        Some(candidates[index].clone())
    }

    fn name(&self) -> &'static str {
        "round_robin"
    }
}
