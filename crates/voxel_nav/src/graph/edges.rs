//! Deduplicating edge accumulator shared by both adjacency passes.

use std::collections::HashSet;

use super::node::NavGraphEdge;
use crate::types::NavNodeId;

/// Canonical edge set. At most one edge between any two nodes.
#[derive(Debug, Default)]
pub(crate) struct EdgeSet {
  seen: HashSet<NavGraphEdge>,
  edges: Vec<NavGraphEdge>,
}

impl EdgeSet {
  pub(crate) fn with_capacity(capacity: usize) -> Self {
    Self {
      seen: HashSet::with_capacity(capacity),
      edges: Vec::with_capacity(capacity),
    }
  }

  /// Insert an unordered pair. Returns the edge if it is new.
  pub(crate) fn insert(&mut self, a: NavNodeId, b: NavNodeId) -> Option<NavGraphEdge> {
    let edge = NavGraphEdge::new(a, b)?;
    if self.seen.insert(edge) {
      self.edges.push(edge);
      Some(edge)
    } else {
      None
    }
  }

  pub(crate) fn len(&self) -> usize {
    self.edges.len()
  }

  pub(crate) fn into_edges(self) -> Vec<NavGraphEdge> {
    self.edges
  }
}
