//! Health-check driven liveness filter.

use crate::candidate::{marker_of, Candidate};
use crate::selector::{Filter, SelectContext};

/// Drops candidates whose marker reached `max_fails`.
///
/// Unlike [`FailFilter`](super::FailFilter) there is no cool-down: a candidate
/// only comes back after a successful probe resets its marker. Fails open:
/// when every candidate is over the threshold the input is returned as is.
#[derive(Debug, Clone)]
pub struct HealthCheckFilter {
    max_fails: i64,
}

impl HealthCheckFilter {
    pub fn new(max_fails: i64) -> Self {
        Self { max_fails }
    }

    fn max_fails(&self) -> u64 {
        if self.max_fails <= 0 {
            1
        } else {
            self.max_fails as u64
        }
    }
}

impl<T: Candidate + Clone> Filter<T> for HealthCheckFilter {
    fn filter(&self, _ctx: &SelectContext, candidates: &[T]) -> Vec<T> {
        if candidates.len() <= 1 {
            return candidates.to_vec();
        }

        let max_fails = self.max_fails();
        let healthy: Vec<T> = candidates
            .iter()
            .filter(|c| marker_of(*c).map_or(true, |m| m.count() < max_fails))
            .cloned()
            .collect();

        if healthy.is_empty() {
            tracing::debug!(
                candidates = candidates.len(),
                "all candidates unhealthy, failing open"
            );
            return candidates.to_vec();
        }
        healthy
    }

    fn name(&self) -> &'static str {
        "health_check"
    }
}
