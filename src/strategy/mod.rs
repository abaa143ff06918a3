//! Selection strategies.
//!
//! # Data Flow
//! ```text
//! filtered candidates
//!     → round_robin.rs   (atomic counter mod len)
//!     → random.rs        (weighted sampling on `weight` metadata)
//!     → fifo.rs          (first in list)
//!     → hash.rs          (CRC-32 of routing hash, else random)
//!     → least_conn.rs    (fewest active connections, random tie-break)
//!     → least_latency.rs (lowest latency, random tie-break)
//!     → one candidate
//! ```
//!
//! # Design Decisions
//! - Strategies only rank; eligibility is the filters' job
//! - Stateful strategies own their lock or atomic, nothing is global
//! - RNG-backed strategies take an optional seed for reproducible tests

pub mod fifo;
pub mod hash;
pub mod least_conn;
pub mod least_latency;
pub mod random;
pub mod round_robin;

use std::fmt;
use std::str::FromStr;

use crate::candidate::Candidate;
use crate::selector::Strategy;

pub use fifo::Fifo;
pub use hash::Hash;
pub use least_conn::LeastConn;
pub use least_latency::LeastLatency;
pub use random::Random;
pub use round_robin::RoundRobin;

/// Strategy named in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrategyKind {
    #[default]
    RoundRobin,
    Random,
    Fifo,
    Hash,
    LeastConn,
    LeastLatency,
}

impl StrategyKind {
    /// Parse a configured name, accepting the short aliases. Unknown names
    /// yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "round" | "rr" | "round-robin" | "round_robin" => Some(Self::RoundRobin),
            "random" | "rand" => Some(Self::Random),
            "fifo" | "ha" => Some(Self::Fifo),
            "hash" => Some(Self::Hash),
            "leastconn" | "lc" | "least-conn" | "least_conn" => Some(Self::LeastConn),
            "leastlatency" | "ll" | "least-latency" | "least_latency" => {
                Some(Self::LeastLatency)
            }
            _ => None,
        }
    }

    /// Instantiate a fresh strategy of this kind.
    pub fn build<T: Candidate + Clone + 'static>(self) -> Box<dyn Strategy<T>> {
        match self {
            Self::RoundRobin => Box::new(RoundRobin::new()),
            Self::Random => Box::new(Random::new()),
            Self::Fifo => Box::new(Fifo::new()),
            Self::Hash => Box::new(Hash::new()),
            Self::LeastConn => Box::new(LeastConn::new()),
            Self::LeastLatency => Box::new(LeastLatency::new()),
        }
    }
}

impl FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| format!("unknown strategy: {}", s))
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::RoundRobin => "round-robin",
            Self::Random => "random",
            Self::Fifo => "fifo",
            Self::Hash => "hash",
            Self::LeastConn => "least-conn",
            Self::LeastLatency => "least-latency",
        };
        f.write_str(name)
    }
}
