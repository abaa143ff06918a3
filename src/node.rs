//! Node abstraction.
//!
//! # Responsibilities
//! - Represent a single upstream node
//! - Track active connections (for least-conn)
//! - Track last observed latency (for least-latency)
//! - Own the failure marker shared by filters and the health checker

use std::ops::Deref;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::candidate::{
    Addressable, Candidate, Connectable, LatencyStater, Markable, Metadata, Metadatable,
};
use crate::config::NodeConfig;
use crate::selector::marker::Marker;

/// A single upstream node.
#[derive(Debug, Default)]
pub struct Node {
    name: String,
    address: String,
    marker: Marker,
    metadata: Metadata,
    active_conns: AtomicI64,
    latency_nanos: AtomicU64,
}

impl Node {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            ..Default::default()
        }
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn from_config(config: &NodeConfig) -> Self {
        Self::new(config.name.clone(), config.address.clone()).with_metadata(config.metadata.clone())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn marker(&self) -> &Marker {
        &self.marker
    }

    /// Current number of connections held through [`connect_guard`](Self::connect_guard).
    pub fn active_conns(&self) -> i64 {
        self.active_conns.load(Ordering::Relaxed)
    }

    /// Count a connection until the returned guard drops.
    pub fn connect_guard(self: &Arc<Self>) -> NodeConnectionGuard {
        self.active_conns.fetch_add(1, Ordering::Relaxed);
        NodeConnectionGuard { node: self.clone() }
    }

    /// Feed a connection outcome into the marker.
    pub fn report(&self, success: bool) {
        if success {
            self.marker.reset();
        } else {
            self.marker.mark();
            tracing::debug!(
                node = %self.name,
                fails = self.marker.count(),
                "node failure reported"
            );
        }
    }

    pub fn record_latency(&self, latency: Duration) {
        let nanos = u64::try_from(latency.as_nanos()).unwrap_or(u64::MAX);
        self.latency_nanos.store(nanos, Ordering::Relaxed);
    }

    /// Last recorded latency; zero until one is recorded.
    pub fn latency(&self) -> Duration {
        Duration::from_nanos(self.latency_nanos.load(Ordering::Relaxed))
    }
}

impl Markable for Node {
    fn marker(&self) -> Option<&Marker> {
        Some(&self.marker)
    }
}

impl Metadatable for Node {
    fn metadata(&self) -> Option<&Metadata> {
        Some(&self.metadata)
    }
}

impl Connectable for Node {
    fn active_conns(&self) -> i64 {
        Node::active_conns(self)
    }
}

impl LatencyStater for Node {
    fn latency(&self) -> Duration {
        Node::latency(self)
    }
}

impl Addressable for Node {
    fn address(&self) -> &str {
        &self.address
    }
}

impl Candidate for Node {
    fn as_markable(&self) -> Option<&dyn Markable> {
        Some(self)
    }

    fn as_metadatable(&self) -> Option<&dyn Metadatable> {
        Some(self)
    }

    fn as_connectable(&self) -> Option<&dyn Connectable> {
        Some(self)
    }

    fn as_latency_stater(&self) -> Option<&dyn LatencyStater> {
        Some(self)
    }

    fn as_addressable(&self) -> Option<&dyn Addressable> {
        Some(self)
    }
}

/// A RAII guard that manages the active connection count.
#[derive(Debug)]
pub struct NodeConnectionGuard {
    node: Arc<Node>,
}

impl Deref for NodeConnectionGuard {
    type Target = Node;
    fn deref(&self) -> &Self::Target {
        &self.node
    }
}

impl Drop for NodeConnectionGuard {
    fn drop(&mut self) {
        self.node.active_conns.fetch_sub(1, Ordering::Relaxed);
    }
}
