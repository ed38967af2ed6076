//! Node identity map (§3, §9): `NodeScore` state keyed by stable node
//! identity rather than attached to the node itself, since the DOM adapter
//! gives us no spare field to hide it in.

use std::collections::HashMap;

use crate::dom::{self, Node};

#[derive(Debug, Clone, Copy, Default)]
pub struct NodeScore {
    pub content_score: f64,
    pub initialized: bool,
}

/// Keyed by [`dom::node_key`]. Entries must be dropped when their node is
/// detached from the tree (§3 invariant); callers go through [`NodeStore::remove`]
/// rather than reaching into the map directly so that discipline is kept in
/// one place.
#[derive(Default)]
pub struct NodeStore {
    scores: HashMap<usize, NodeScore>,
    /// Keeps the node's `Rc` allocation alive so its address stays a valid
    /// map key for as long as we hold a score for it.
    keepalive: HashMap<usize, Node>,
}

impl NodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, node: &Node) -> Option<NodeScore> {
        self.scores.get(&dom::node_key(node)).copied()
    }

    pub fn is_initialized(&self, node: &Node) -> bool {
        self.get(node).map(|s| s.initialized).unwrap_or(false)
    }

    pub fn set(&mut self, node: &Node, score: NodeScore) {
        let key = dom::node_key(node);
        self.scores.insert(key, score);
        self.keepalive.insert(key, node.clone());
    }

    pub fn add_score(&mut self, node: &Node, delta: f64) {
        let mut entry = self.get(node).unwrap_or_default();
        entry.content_score += delta;
        self.set(node, entry);
    }

    pub fn content_score(&self, node: &Node) -> f64 {
        self.get(node).map(|s| s.content_score).unwrap_or(0.0)
    }

    pub fn remove(&mut self, node: &Node) {
        let key = dom::node_key(node);
        self.scores.remove(&key);
        self.keepalive.remove(&key);
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

/// `{element, scaledScore}` (§3) — a node scaled by `1 - linkDensity` for TopN ranking.
#[derive(Clone)]
pub struct Candidate {
    pub node: Node,
    pub scaled_score: f64,
}

/// Fixed-capacity, descending-sorted pool of best candidates (§3, §4.8).
/// Ties are broken by insertion order: a new entry must strictly exceed an
/// existing entry's score to displace it when scores are equal (§5 ordering rule).
pub struct TopN {
    capacity: usize,
    entries: Vec<Candidate>,
}

impl TopN {
    pub fn new(capacity: usize) -> Self {
        Self { capacity: capacity.max(1), entries: Vec::new() }
    }

    pub fn insert(&mut self, candidate: Candidate) {
        let pos = self
            .entries
            .iter()
            .position(|existing| candidate.scaled_score > existing.scaled_score)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, candidate);
        self.entries.truncate(self.capacity);
    }

    pub fn best(&self) -> Option<&Candidate> {
        self.entries.first()
    }

    pub fn entries(&self) -> &[Candidate] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
