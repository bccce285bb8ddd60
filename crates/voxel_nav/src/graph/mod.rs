//! Connectivity graph over navigable octree leaves.
//!
//! Nodes are navigable leaves; edges connect leaves whose bounds touch within
//! a small tolerance (face, edge or corner contact). The graph is immutable
//! once built and carries no search state.
//!
//! # Module Structure
//!
//! - [`node`]: `NavGraphNode`, `NavGraphEdge`
//! - [`builder`]: `NavGraphBuilder` - leaf collection and both edge passes
//! - `face_pass` / `adjacency_pass`: candidate pair generation
//! - `edges`: deduplicating edge set

mod adjacency_pass;
pub mod builder;
mod edges;
mod face_pass;
pub mod node;

use std::collections::HashMap;

pub use builder::{LeafRecord, NavGraphBuilder};
pub use node::{NavGraphEdge, NavGraphNode};

use crate::types::{LeafId, NavNodeId};

/// Counters collected while building the graph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GraphStats {
  /// Leaves examined.
  pub leaves: usize,
  /// Leaves kept as nodes.
  pub navigable: usize,
  /// Leaves dropped as blocked.
  pub blocked: usize,
  /// Edges found by the face pass.
  pub face_edges: usize,
  /// Extra edges found by the adjacency-hash pass.
  pub adjacency_edges: usize,
  /// Wall time of the graph build.
  pub build_us: u64,
}

/// Immutable navigation graph.
#[derive(Debug, Default)]
pub struct NavGraph {
  nodes: Vec<NavGraphNode>,
  edges: Vec<NavGraphEdge>,
  by_leaf: HashMap<LeafId, NavNodeId>,
  epsilon: f64,
  stats: GraphStats,
}

impl NavGraph {
  /// All nodes, indexed by `NavNodeId`.
  #[inline]
  pub fn nodes(&self) -> &[NavGraphNode] {
    &self.nodes
  }

  /// Node by id.
  #[inline]
  pub fn node(&self, id: NavNodeId) -> Option<&NavGraphNode> {
    self.nodes.get(id.index())
  }

  /// All edges in insertion order.
  #[inline]
  pub fn edges(&self) -> &[NavGraphEdge] {
    &self.edges
  }

  /// Node count.
  #[inline]
  pub fn len(&self) -> usize {
    self.nodes.len()
  }

  /// No navigable leaves.
  #[inline]
  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }

  /// Edge count.
  #[inline]
  pub fn edge_count(&self) -> usize {
    self.edges.len()
  }

  /// Graph node for a navigable leaf.
  #[inline]
  pub fn node_for_leaf(&self, leaf: LeafId) -> Option<NavNodeId> {
    self.by_leaf.get(&leaf).copied()
  }

  /// Contact tolerance used during the build.
  #[inline]
  pub fn epsilon(&self) -> f64 {
    self.epsilon
  }

  /// Build counters.
  #[inline]
  pub fn stats(&self) -> &GraphStats {
    &self.stats
  }

  /// True if `a` and `b` share an edge.
  pub fn are_neighbors(&self, a: NavNodeId, b: NavNodeId) -> bool {
    self
      .node(a)
      .is_some_and(|node| node.neighbors().contains(&b))
  }
}
