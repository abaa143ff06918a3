//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Active health checks (checker.rs):
//!     Periodic timer (first tick immediate)
//!     → Probe every candidate concurrently (probe.rs: tcp | http)
//!     → Marker reset on success, marked on failure
//!
//! Passive signals (outside this module):
//!     Connection outcome observed by the caller
//!     → Node::report → same Marker
//!
//! Consumers:
//!     HealthCheckFilter (fails open) / FailFilter (cool-down)
//! ```
//!
//! # Design Decisions
//! - The checker only writes markers; filters decide what a marker means
//! - Candidates without an address or a marker are skipped, not failed
//! - Stop is observed between passes; in-flight probes end by timeout

pub mod checker;
pub mod probe;

pub use checker::{
    CheckType, HealthCheckSettings, HealthChecker, HealthCheckerBuilder, PassSummary,
    DEFAULT_EXPECT_STATUS, DEFAULT_INTERVAL, DEFAULT_TIMEOUT,
};
pub use probe::ProbeError;
