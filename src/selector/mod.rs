//! Selection subsystem.
//!
//! # Data Flow
//! ```text
//! Caller snapshot of candidates
//!     → Selector::select
//!         → liveness filter (FailFilter | HealthCheckFilter)
//!         → BackupFilter
//!         → Strategy::apply
//!     → Some(candidate) | None
//!
//! Caller dials the candidate
//!     → success: Marker::reset
//!     → failure: Marker::mark
//! ```
//!
//! # Design Decisions
//! - The selector holds no mutable state; each strategy guards its own
//! - Filters and strategies never block and never perform I/O
//! - `None` means "no eligible destination" and is retryable upstream

pub mod marker;
pub mod weighted;

use crate::filter::{BackupFilter, FailFilter};
use crate::strategy::RoundRobin;

pub use marker::Marker;
pub use weighted::RandomWeighted;

/// Default maximum number of failures before a candidate is excluded.
pub const DEFAULT_MAX_FAILS: i64 = 1;
/// Default cool-down period for a failed candidate.
pub const DEFAULT_FAIL_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

/// Routing key attached to a selection, e.g. the client source address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingHash {
    pub source: String,
}

/// Per-call selection context.
#[derive(Debug, Clone, Default)]
pub struct SelectContext {
    hash: Option<RoutingHash>,
}

impl SelectContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context carrying a routing hash key for the hash strategy.
    pub fn with_hash(source: impl Into<String>) -> Self {
        Self {
            hash: Some(RoutingHash {
                source: source.into(),
            }),
        }
    }

    pub fn hash(&self) -> Option<&RoutingHash> {
        self.hash.as_ref()
    }
}

/// Chooses one candidate out of an already filtered list.
pub trait Strategy<T>: Send + Sync {
    /// `None` only when `candidates` is empty.
    fn apply(&self, ctx: &SelectContext, candidates: &[T]) -> Option<T>;

    fn name(&self) -> &'static str;
}

/// Removes ineligible candidates before a strategy runs.
pub trait Filter<T>: Send + Sync {
    fn filter(&self, ctx: &SelectContext, candidates: &[T]) -> Vec<T>;

    fn name(&self) -> &'static str;
}

/// One strategy composed with an ordered filter pipeline.
pub struct Selector<T> {
    strategy: Box<dyn Strategy<T>>,
    filters: Vec<Box<dyn Filter<T>>>,
}

impl<T: Clone> Selector<T> {
    pub fn new(strategy: Box<dyn Strategy<T>>, filters: Vec<Box<dyn Filter<T>>>) -> Self {
        Self { strategy, filters }
    }

    /// Run `candidates` through every filter in order, then the strategy.
    pub fn select(&self, ctx: &SelectContext, candidates: &[T]) -> Option<T> {
        if candidates.is_empty() {
            return None;
        }

        let mut eligible = candidates.to_vec();
        for filter in &self.filters {
            eligible = filter.filter(ctx, &eligible);
            if eligible.is_empty() {
                tracing::trace!(filter = filter.name(), "no candidate left after filter");
                return None;
            }
        }

        self.strategy.apply(ctx, &eligible)
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    pub fn filter_names(&self) -> Vec<&'static str> {
        self.filters.iter().map(|f| f.name()).collect()
    }
}

impl<T> Default for Selector<T>
where
    T: crate::candidate::Candidate + Clone + 'static,
{
    /// Round-robin behind a fail filter with default thresholds and a
    /// backup filter.
    fn default() -> Self {
        Self::new(
            Box::new(RoundRobin::new()),
            vec![
                Box::new(FailFilter::new(DEFAULT_MAX_FAILS, DEFAULT_FAIL_TIMEOUT)),
                Box::new(BackupFilter::new()),
            ],
        )
    }
}

impl<T> std::fmt::Debug for Selector<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Selector")
            .field("strategy", &self.strategy.name())
            .field(
                "filters",
                &self.filters.iter().map(|x| x.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
