//! NavGraphNode and NavGraphEdge - graph vertices and undirected edges.

use smallvec::SmallVec;

use crate::octree::Bounds;
use crate::types::{LeafId, NavNodeId};

/// One navigable leaf in the graph.
///
/// Carries a copy of the leaf bounds so searches never touch the tree.
#[derive(Clone, Debug)]
pub struct NavGraphNode {
  id: NavNodeId,
  leaf: LeafId,
  bounds: Bounds,
  pub(crate) neighbors: SmallVec<[NavNodeId; 8]>,
}

impl NavGraphNode {
  pub(crate) fn new(id: NavNodeId, leaf: LeafId, bounds: Bounds) -> Self {
    Self {
      id,
      leaf,
      bounds,
      neighbors: SmallVec::new(),
    }
  }

  /// Graph node id.
  #[inline]
  pub fn id(&self) -> NavNodeId {
    self.id
  }

  /// Underlying octree leaf.
  #[inline]
  pub fn leaf(&self) -> LeafId {
    self.leaf
  }

  /// Leaf bounds.
  #[inline]
  pub fn bounds(&self) -> &Bounds {
    &self.bounds
  }

  /// Adjacent nodes in edge insertion order.
  #[inline]
  pub fn neighbors(&self) -> &[NavNodeId] {
    &self.neighbors
  }
}

/// Undirected edge stored as a canonical `(low, high)` pair.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct NavGraphEdge {
  low: NavNodeId,
  high: NavNodeId,
}

impl NavGraphEdge {
  /// Canonicalize an unordered pair. Returns `None` for self-loops.
  pub fn new(a: NavNodeId, b: NavNodeId) -> Option<Self> {
    match a.cmp(&b) {
      std::cmp::Ordering::Less => Some(Self { low: a, high: b }),
      std::cmp::Ordering::Greater => Some(Self { low: b, high: a }),
      std::cmp::Ordering::Equal => None,
    }
  }

  /// Smaller endpoint.
  #[inline]
  pub fn low(&self) -> NavNodeId {
    self.low
  }

  /// Larger endpoint.
  #[inline]
  pub fn high(&self) -> NavNodeId {
    self.high
  }
}
