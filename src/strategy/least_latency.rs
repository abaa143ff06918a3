//! Least latency selection strategy.

use std::sync::Mutex;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::candidate::Candidate;
use crate::selector::{SelectContext, Strategy};
use crate::strategy::least_conn::{min_tied, pick_tied};

/// Selects the candidate with the lowest observed latency. Candidates with
/// no latency, or a non-positive one, rank last. Ties are broken uniformly at
/// random.
#[derive(Debug)]
pub struct LeastLatency {
    rng: Mutex<StdRng>,
}

impl LeastLatency {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for LeastLatency {
    fn default() -> Self {
        Self::new()
    }
}

fn effective_latency<T: Candidate>(candidate: &T) -> Duration {
    match candidate.as_latency_stater().map(|l| l.latency()) {
        Some(latency) if !latency.is_zero() => latency,
        _ => Duration::MAX,
    }
}

impl<T: Candidate + Clone> Strategy<T> for LeastLatency {
    fn apply(&self, _ctx: &SelectContext, candidates: &[T]) -> Option<T> {
        let tied = min_tied(candidates, effective_latency);
        pick_tied(&self.rng, tied)
    }

    fn name(&self) -> &'static str {
        "least_latency"
    }
}
