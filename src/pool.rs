//! Node pool management.
//!
//! # Responsibilities
//! - Manage collections of nodes grouped by name
//! - Apply each group's selector to pick a node
//! - Own each group's health checker and its lifecycle

use std::collections::HashMap;
use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::config::{build_health_checker, build_selector, GroupConfig, SelectorFileConfig};
use crate::health::HealthChecker;
use crate::lifecycle::Shutdown;
use crate::node::Node;
use crate::observability::metrics;
use crate::selector::{SelectContext, Selector};

/// A named set of nodes with its selector.
#[derive(Debug)]
pub struct NodeGroup {
    name: String,
    nodes: Vec<Arc<Node>>,
    selector: Selector<Arc<Node>>,
    health: Option<HealthChecker>,
}

impl NodeGroup {
    pub fn new(name: impl Into<String>, nodes: Vec<Arc<Node>>, selector: Selector<Arc<Node>>) -> Self {
        Self {
            name: name.into(),
            nodes,
            selector,
            health: None,
        }
    }

    pub fn with_health_checker(mut self, checker: HealthChecker) -> Self {
        self.health = Some(checker);
        self
    }

    pub fn from_config(config: &GroupConfig) -> Self {
        let nodes = config
            .nodes
            .iter()
            .map(|n| Arc::new(Node::from_config(n)))
            .collect();
        let group = Self::new(config.name.clone(), nodes, build_selector(&config.selector));
        match build_health_checker(&config.selector.health_check) {
            Some(checker) => group.with_health_checker(checker),
            None => group,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn nodes(&self) -> &[Arc<Node>] {
        &self.nodes
    }

    pub fn selector(&self) -> &Selector<Arc<Node>> {
        &self.selector
    }

    pub fn health_checker(&self) -> Option<&HealthChecker> {
        self.health.as_ref()
    }

    /// Pick a node for this request.
    pub fn select(&self, ctx: &SelectContext) -> Option<Arc<Node>> {
        let picked = self.selector.select(ctx, &self.nodes);
        metrics::record_selection(&self.name, picked.is_some());
        if picked.is_none() {
            tracing::debug!(
                group = %self.name,
                node_count = self.nodes.len(),
                "no node available in group"
            );
        }
        picked
    }

    /// Start the health checker, if the group has one. It runs until
    /// [`stop`](Self::stop) or until `shutdown` is triggered.
    pub fn start_health_checks(&self, shutdown: &Shutdown) -> Option<JoinHandle<()>> {
        self.health
            .as_ref()
            .map(|checker| checker.start_with_shutdown(self.nodes.clone(), shutdown))
    }

    pub fn stop(&self) {
        if let Some(checker) = &self.health {
            checker.stop();
        }
    }
}

/// Manages node groups by name.
#[derive(Debug, Default)]
pub struct NodeManager {
    groups: HashMap<String, NodeGroup>,
}

impl NodeManager {
    /// Build every group from a validated configuration.
    pub fn new(config: &SelectorFileConfig) -> Self {
        let groups = config
            .groups
            .iter()
            .map(|g| (g.name.clone(), NodeGroup::from_config(g)))
            .collect();
        Self { groups }
    }

    pub fn insert(&mut self, group: NodeGroup) {
        self.groups.insert(group.name.clone(), group);
    }

    pub fn group(&self, name: &str) -> Option<&NodeGroup> {
        self.groups.get(name)
    }

    pub fn groups(&self) -> impl Iterator<Item = &NodeGroup> {
        self.groups.values()
    }

    /// Select a node from the named group.
    pub fn select(&self, group: &str, ctx: &SelectContext) -> Option<Arc<Node>> {
        match self.groups.get(group) {
            Some(g) => g.select(ctx),
            None => {
                tracing::debug!(group = %group, "group not found");
                None
            }
        }
    }

    /// Start every configured health checker, all subscribed to `shutdown`.
    pub fn start_health_checks(&self, shutdown: &Shutdown) -> Vec<JoinHandle<()>> {
        self.groups
            .values()
            .filter_map(|group| group.start_health_checks(shutdown))
            .collect()
    }

    pub fn stop(&self) {
        for group in self.groups.values() {
            group.stop();
        }
    }
}
