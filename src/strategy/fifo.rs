//! First-in-list selection strategy.

use crate::selector::{SelectContext, Strategy};

/// Always picks the first candidate.
///
/// Sticks to the head of the list until a filter removes it after failures,
/// then falls through to the next one.
#[derive(Debug, Default)]
pub struct Fifo;

impl Fifo {
    pub fn new() -> Self {
        Self
    }
}

impl<T: Clone + Send + Sync> Strategy<T> for Fifo {
    fn apply(&self, _ctx: &SelectContext, candidates: &[T]) -> Option<T> {
        candidates.first().cloned()
    }

    fn name(&self) -> &'static str {
        "fifo"
    }
}
