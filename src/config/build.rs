//! Translation of selector configuration into runtime objects.

use std::time::Duration;

use crate::candidate::Candidate;
use crate::config::schema::{HealthCheckConfig, SelectorConfig};
use crate::filter::{BackupFilter, FailFilter, HealthCheckFilter};
use crate::health::{CheckType, HealthChecker};
use crate::selector::{Filter, Selector};
use crate::strategy::StrategyKind;

/// Strategy for a configured name; unknown names fall back to round-robin.
pub fn parse_strategy(name: &str) -> StrategyKind {
    StrategyKind::from_name(name).unwrap_or_else(|| {
        tracing::warn!(
            strategy = %name,
            "unknown selection strategy, falling back to round-robin"
        );
        StrategyKind::RoundRobin
    })
}

/// Build a selector: liveness filter, then backup filter, then strategy.
///
/// The liveness filter is [`HealthCheckFilter`] when health checking is
/// enabled and [`FailFilter`] otherwise.
pub fn build_selector<T>(config: &SelectorConfig) -> Selector<T>
where
    T: Candidate + Clone + 'static,
{
    let strategy = parse_strategy(&config.strategy).build::<T>();

    let liveness: Box<dyn Filter<T>> = if config.health_check.enabled {
        Box::new(HealthCheckFilter::new(config.max_fails))
    } else {
        Box::new(FailFilter::new(config.max_fails, config.fail_timeout))
    };

    Selector::new(strategy, vec![liveness, Box::new(BackupFilter::new())])
}

/// Build a health checker, or `None` when health checking is disabled.
pub fn build_health_checker(config: &HealthCheckConfig) -> Option<HealthChecker> {
    if !config.enabled {
        return None;
    }

    Some(
        HealthChecker::builder()
            .check_type(CheckType::from_name(&config.check_type))
            .interval(Duration::from_secs(config.interval_secs))
            .timeout(Duration::from_secs(config.timeout_secs))
            .path(config.path.clone())
            .expect_status(config.expect_status)
            .build(),
    )
}
