//! Candidate capabilities.
//!
//! # Data Flow
//! ```text
//! Candidate (node, chain, test double)
//!     → as_markable()       → Marker        (filters, health checker)
//!     → as_metadatable()    → Metadata      (weight, backup, overrides)
//!     → as_connectable()    → active conns  (least-conn)
//!     → as_latency_stater() → latency       (least-latency)
//!     → as_addressable()    → address       (health checker)
//! ```
//!
//! # Design Decisions
//! - Every capability is optional; a missing one reads as a neutral default
//! - The selection core never constructs, mutates or drops candidates
//! - Capability lookup happens per operation, so a candidate may expose
//!   a capability only some of the time (e.g. a marker created lazily)

pub mod metadata;

use std::sync::Arc;
use std::time::Duration;

use crate::selector::marker::Marker;

pub use metadata::{Metadata, MetadataValue};

/// Metadata key holding the random-strategy weight.
pub const LABEL_WEIGHT: &str = "weight";
/// Metadata key flagging a backup candidate.
pub const LABEL_BACKUP: &str = "backup";
/// Metadata key overriding the fail filter's max fails.
pub const LABEL_MAX_FAILS: &str = "max-fails";
/// Metadata key overriding the fail filter's fail timeout.
pub const LABEL_FAIL_TIMEOUT: &str = "fail-timeout";

/// Exposes the failure marker of a candidate.
pub trait Markable {
    fn marker(&self) -> Option<&Marker>;
}

/// Exposes the metadata map of a candidate.
pub trait Metadatable {
    fn metadata(&self) -> Option<&Metadata>;
}

/// Exposes the number of connections currently open through a candidate.
pub trait Connectable {
    fn active_conns(&self) -> i64;
}

/// Exposes the last observed latency of a candidate.
pub trait LatencyStater {
    fn latency(&self) -> Duration;
}

/// Exposes a dialable `host:port` address.
pub trait Addressable {
    fn address(&self) -> &str;
}

/// An element that can be selected.
///
/// Implementors override the `as_*` accessors for the capabilities they
/// support. Everything defaults to `None`.
pub trait Candidate: Send + Sync {
    fn as_markable(&self) -> Option<&dyn Markable> {
        None
    }

    fn as_metadatable(&self) -> Option<&dyn Metadatable> {
        None
    }

    fn as_connectable(&self) -> Option<&dyn Connectable> {
        None
    }

    fn as_latency_stater(&self) -> Option<&dyn LatencyStater> {
        None
    }

    fn as_addressable(&self) -> Option<&dyn Addressable> {
        None
    }
}

/// The candidate's marker, if it is markable and currently has one.
pub fn marker_of<C: Candidate + ?Sized>(candidate: &C) -> Option<&Marker> {
    candidate.as_markable().and_then(|m| m.marker())
}

/// The candidate's metadata, if it carries any.
pub fn metadata_of<C: Candidate + ?Sized>(candidate: &C) -> Option<&Metadata> {
    candidate.as_metadatable().and_then(|m| m.metadata())
}

impl<C: Candidate + ?Sized> Candidate for Arc<C> {
    fn as_markable(&self) -> Option<&dyn Markable> {
        (**self).as_markable()
    }

    fn as_metadatable(&self) -> Option<&dyn Metadatable> {
        (**self).as_metadatable()
    }

    fn as_connectable(&self) -> Option<&dyn Connectable> {
        (**self).as_connectable()
    }

    fn as_latency_stater(&self) -> Option<&dyn LatencyStater> {
        (**self).as_latency_stater()
    }

    fn as_addressable(&self) -> Option<&dyn Addressable> {
        (**self).as_addressable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Bare;

    impl Candidate for Bare {}

    struct Tagged {
        marker: Marker,
        metadata: Metadata,
    }

    impl Markable for Tagged {
        fn marker(&self) -> Option<&Marker> {
            Some(&self.marker)
        }
    }

    impl Metadatable for Tagged {
        fn metadata(&self) -> Option<&Metadata> {
            Some(&self.metadata)
        }
    }

    impl Candidate for Tagged {
        fn as_markable(&self) -> Option<&dyn Markable> {
            Some(self)
        }

        fn as_metadatable(&self) -> Option<&dyn Metadatable> {
            Some(self)
        }
    }

    #[test]
    fn test_missing_capabilities_are_none() {
        let bare = Bare;
        assert!(marker_of(&bare).is_none());
        assert!(metadata_of(&bare).is_none());
        assert!(bare.as_connectable().is_none());
        assert!(bare.as_latency_stater().is_none());
        assert!(bare.as_addressable().is_none());
    }

    #[test]
    fn test_arc_delegates_capabilities() {
        let tagged = Arc::new(Tagged {
            marker: Marker::new(),
            metadata: Metadata::new().with(LABEL_WEIGHT, 3),
        });
        tagged.marker.mark();

        assert_eq!(marker_of(&tagged).map(Marker::count), Some(1));
        assert_eq!(metadata_of(&tagged).map(|md| md.get_int(LABEL_WEIGHT)), Some(3));
    }
}
