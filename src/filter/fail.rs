//! Passive failure filter with cool-down.

use std::time::{Duration, Instant};

use crate::candidate::{marker_of, metadata_of, Candidate, LABEL_FAIL_TIMEOUT, LABEL_MAX_FAILS};
use crate::selector::{Filter, SelectContext, DEFAULT_FAIL_TIMEOUT};

/// Drops candidates that failed `max_fails` times within the last
/// `fail_timeout`.
///
/// A candidate whose marker reached the threshold becomes eligible again once
/// `fail_timeout` has passed since its last failure. Both thresholds can be
/// overridden per candidate with the `max-fails` and `fail-timeout` metadata.
#[derive(Debug, Clone)]
pub struct FailFilter {
    max_fails: i64,
    fail_timeout: Duration,
}

impl FailFilter {
    pub fn new(max_fails: i64, fail_timeout: Duration) -> Self {
        Self {
            max_fails,
            fail_timeout,
        }
    }

    /// Thresholds in effect for `candidate`, after overrides and coercion.
    pub fn thresholds<T: Candidate + ?Sized>(&self, candidate: &T) -> (u64, Duration) {
        let mut max_fails = self.max_fails;
        let mut fail_timeout = self.fail_timeout;
        if let Some(md) = metadata_of(candidate) {
            if md.contains(LABEL_MAX_FAILS) {
                max_fails = md.get_int(LABEL_MAX_FAILS);
            }
            if md.contains(LABEL_FAIL_TIMEOUT) {
                fail_timeout = md.get_duration(LABEL_FAIL_TIMEOUT);
            }
        }
        if max_fails <= 0 {
            max_fails = 1;
        }
        if fail_timeout.is_zero() {
            fail_timeout = DEFAULT_FAIL_TIMEOUT;
        }
        (max_fails as u64, fail_timeout)
    }

    fn is_alive<T: Candidate>(&self, candidate: &T, now: Instant) -> bool {
        let Some(marker) = marker_of(candidate) else {
            return true;
        };
        let (count, last_failure) = marker.snapshot();
        let (max_fails, fail_timeout) = self.thresholds(candidate);
        if count < max_fails {
            return true;
        }
        match last_failure {
            Some(at) => now.saturating_duration_since(at) >= fail_timeout,
            None => true,
        }
    }
}

impl<T: Candidate + Clone> Filter<T> for FailFilter {
    fn filter(&self, _ctx: &SelectContext, candidates: &[T]) -> Vec<T> {
        if candidates.len() <= 1 {
            return candidates.to_vec();
        }

        let now = Instant::now();
        candidates
            .iter()
            .filter(|c| self.is_alive(*c, now))
            .cloned()
            .collect()
    }

    fn name(&self) -> &'static str {
        "fail"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::{Markable, Metadata, Metadatable};
    use crate::selector::Marker;

    #[derive(Debug, Default)]
    struct Peer {
        name: &'static str,
        marker: Marker,
        metadata: Metadata,
    }

    impl Markable for Peer {
        fn marker(&self) -> Option<&Marker> {
            Some(&self.marker)
        }
    }

    impl Metadatable for Peer {
        fn metadata(&self) -> Option<&Metadata> {
            Some(&self.metadata)
        }
    }

    impl Candidate for Peer {
        fn as_markable(&self) -> Option<&dyn Markable> {
            Some(self)
        }

        fn as_metadatable(&self) -> Option<&dyn Metadatable> {
            Some(self)
        }
    }

    fn peer(name: &'static str) -> std::sync::Arc<Peer> {
        std::sync::Arc::new(Peer {
            name,
            ..Default::default()
        })
    }

    fn names(list: &[std::sync::Arc<Peer>]) -> Vec<&'static str> {
        list.iter().map(|p| p.name).collect()
    }

    fn ago(d: Duration) -> Instant {
        Instant::now().checked_sub(d).unwrap_or_else(Instant::now)
    }

    #[test]
    fn test_failed_within_timeout_is_dropped() {
        let filter = FailFilter::new(1, Duration::from_secs(30));
        let (a, b) = (peer("a"), peer("b"));
        a.marker.mark();

        let out = filter.filter(&SelectContext::new(), &[a, b]);
        assert_eq!(names(&out), vec!["b"]);
    }

    #[test]
    fn test_failed_past_timeout_cools_down() {
        let filter = FailFilter::new(1, Duration::from_secs(1));
        let (a, b) = (peer("a"), peer("b"));
        a.marker.mark_at(ago(Duration::from_secs(5)));

        let out = filter.filter(&SelectContext::new(), &[a, b]);
        assert_eq!(names(&out), vec!["a", "b"]);
    }

    #[test]
    fn test_below_max_fails_always_kept() {
        let filter = FailFilter::new(3, Duration::from_secs(60));
        let (a, b) = (peer("a"), peer("b"));
        a.marker.mark();
        a.marker.mark();

        let out = filter.filter(&SelectContext::new(), &[a.clone(), b]);
        assert_eq!(names(&out), vec!["a", "b"]);

        a.marker.mark();
        let out = filter.filter(&SelectContext::new(), &[a, peer("c")]);
        assert_eq!(names(&out), vec!["c"]);
    }

    #[test]
    fn test_single_candidate_is_never_filtered() {
        let filter = FailFilter::new(1, Duration::from_secs(60));
        let a = peer("a");
        a.marker.mark();
        let out = filter.filter(&SelectContext::new(), &[a]);
        assert_eq!(names(&out), vec!["a"]);
    }

    #[test]
    fn test_metadata_overrides_thresholds() {
        let filter = FailFilter::new(1, Duration::from_secs(60));
        let tolerant = std::sync::Arc::new(Peer {
            name: "tolerant",
            metadata: Metadata::new().with(LABEL_MAX_FAILS, 5),
            ..Default::default()
        });
        let quick = std::sync::Arc::new(Peer {
            name: "quick",
            metadata: Metadata::new().with(LABEL_FAIL_TIMEOUT, "1s"),
            ..Default::default()
        });
        tolerant.marker.mark();
        tolerant.marker.mark();
        quick.marker.mark_at(ago(Duration::from_secs(2)));

        let out = filter.filter(&SelectContext::new(), &[tolerant, quick, peer("c")]);
        assert_eq!(names(&out), vec!["tolerant", "quick", "c"]);
    }

    #[test]
    fn test_non_positive_thresholds_are_coerced() {
        let filter = FailFilter::new(0, Duration::ZERO);
        let p = peer("p");
        assert_eq!(filter.thresholds(&*p), (1, DEFAULT_FAIL_TIMEOUT));

        let negative = Peer {
            metadata: Metadata::new()
                .with(LABEL_MAX_FAILS, -2)
                .with(LABEL_FAIL_TIMEOUT, "garbage"),
            ..Default::default()
        };
        assert_eq!(
            FailFilter::new(4, Duration::from_secs(3)).thresholds(&negative),
            (1, DEFAULT_FAIL_TIMEOUT)
        );
    }

    #[test]
    fn test_out_of_range_fail_timeout_uses_default() {
        let huge = std::sync::Arc::new(Peer {
            name: "huge",
            metadata: Metadata::new().with(LABEL_FAIL_TIMEOUT, 1e30),
            ..Default::default()
        });
        huge.marker.mark();

        let filter = FailFilter::new(1, Duration::from_secs(60));
        assert_eq!(filter.thresholds(&*huge), (1, DEFAULT_FAIL_TIMEOUT));

        let out = filter.filter(&SelectContext::new(), &[huge, peer("b")]);
        assert_eq!(names(&out), vec!["b"]);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let filter = FailFilter::new(1, Duration::from_secs(30));
        let (a, b, c) = (peer("a"), peer("b"), peer("c"));
        b.marker.mark();

        let ctx = SelectContext::new();
        let once = filter.filter(&ctx, &[a, b, c]);
        let twice = filter.filter(&ctx, &once);
        assert_eq!(names(&once), names(&twice));
    }
}
