//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     trigger → every subscriber wakes
//!         → health check loops (HealthChecker::start_with_shutdown) exit
//!         → status reporter exits → process exits
//! ```
//!
//! # Design Decisions
//! - One broadcast channel; long-running tasks subscribe, nobody polls
//! - Health loops observe shutdown between passes, so a pass in flight finishes

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
pub use signals::wait_for_signal;
