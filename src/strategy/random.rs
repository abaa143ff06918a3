//! Weighted random selection strategy.

use std::sync::Mutex;

use crate::candidate::{metadata_of, Candidate, LABEL_WEIGHT};
use crate::selector::{RandomWeighted, SelectContext, Strategy};

/// Picks a candidate with probability proportional to its `weight`
/// metadata. Missing or non-positive weights count as 1.
#[derive(Debug)]
pub struct Random<T> {
    sampler: Mutex<RandomWeighted<T>>,
}

impl<T: Clone> Random<T> {
    pub fn new() -> Self {
        Self {
            sampler: Mutex::new(RandomWeighted::new()),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            sampler: Mutex::new(RandomWeighted::with_seed(seed)),
        }
    }
}

impl<T: Clone> Default for Random<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Weight of a candidate for the random strategy.
pub fn weight_of<C: Candidate + ?Sized>(candidate: &C) -> u32 {
    let weight = metadata_of(candidate)
        .map(|md| md.get_int(LABEL_WEIGHT))
        .unwrap_or(0);
    if weight <= 0 {
        1
    } else {
        weight.min(u32::MAX as i64) as u32
    }
}

impl<T: Candidate + Clone> Strategy<T> for Random<T> {
    fn apply(&self, _ctx: &SelectContext, candidates: &[T]) -> Option<T> {
        if candidates.is_empty() {
            return None;
        }

        let mut sampler = self.sampler.lock().unwrap_or_else(|e| e.into_inner());
        sampler.reset();
        for candidate in candidates {
            sampler.add(candidate.clone(), weight_of(candidate));
        }
        let picked = sampler.next();
        // release the clones held for this pick
        sampler.reset();
        picked
    }

    fn name(&self) -> &'static str {
        "random"
    }
}
