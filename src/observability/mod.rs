//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! selector / filters / health checker
//!     → logging.rs (tracing events: trace hash keys, debug probe outcomes)
//!     → metrics.rs (health check counters, fail-count gauges, selections)
//!
//! Consumers:
//!     → stdout (pretty or JSON lines)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - The library only emits; installing a subscriber or recorder is the
//!   binary's job, and without one every event is dropped
//! - Log level comes from `RUST_LOG`, falling back to the config value

pub mod logging;
pub mod metrics;
