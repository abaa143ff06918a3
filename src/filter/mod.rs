//! Candidate filters.
//!
//! # Data Flow
//! ```text
//! candidate snapshot
//!     → fail.rs         (drop recently failed, cool-down after timeout)
//!       | health_check.rs (drop probe-failed, fail open)
//!     → backup.rs       (drop backups while a primary survives)
//!     → strategy
//! ```
//!
//! # Design Decisions
//! - Filters are subtractive and never mutate candidate state
//! - A list of one candidate (or none) is returned unchanged
//! - Exactly one liveness filter sits first; backup status is only judged
//!   among candidates that are already live

pub mod backup;
pub mod fail;
pub mod health_check;

pub use backup::BackupFilter;
pub use fail::FailFilter;
pub use health_check::HealthCheckFilter;
