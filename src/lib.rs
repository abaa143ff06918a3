//! Proxy selector library.
//!
//! Picks one upstream out of a candidate list: an ordered filter pipeline
//! drops ineligible candidates, then a strategy picks among the rest. An
//! optional background health checker keeps each candidate's failure
//! marker current.
//!
//! ```text
//!  candidates ──▶ FailFilter / HealthCheckFilter ──▶ BackupFilter ──▶ Strategy ──▶ one candidate
//!                         ▲
//!                         │ Marker (count, last failure)
//!                         │
//!                 HealthChecker / Node::report
//! ```

// Selection core
pub mod candidate;
pub mod filter;
pub mod selector;
pub mod strategy;

// Health and reference collaborators
pub mod health;
pub mod node;
pub mod pool;

// Cross-cutting concerns
pub mod config;
pub mod lifecycle;
pub mod observability;

pub use candidate::{Candidate, Metadata};
pub use health::HealthChecker;
pub use lifecycle::Shutdown;
pub use node::Node;
pub use pool::{NodeGroup, NodeManager};
pub use selector::{marker::Marker, SelectContext, Selector};
