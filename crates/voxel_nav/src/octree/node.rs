//! SpatialNode - one box-shaped octree cell.
//!
//! A node is either internal (exactly 8 children that partition it) or a
//! leaf. Leaves may reference obstacles; internal nodes only do so through
//! the adaptive-insertion fallback.

use smallvec::SmallVec;

use super::Bounds;
use crate::types::{LeafId, ObstacleId};

/// Octree cell.
#[derive(Debug)]
pub struct SpatialNode {
  id: LeafId,
  bounds: Bounds,
  children: Option<Box<[SpatialNode; 8]>>,
  obstacles: SmallVec<[ObstacleId; 2]>,
}

/// Monotonic id source for cells of one build.
#[derive(Debug, Default)]
pub(crate) struct NodeIdAllocator {
  next: u32,
}

impl NodeIdAllocator {
  pub(crate) fn next(&mut self) -> LeafId {
    let id = LeafId(self.next);
    self.next += 1;
    id
  }

  /// Number of ids handed out so far.
  pub(crate) fn allocated(&self) -> usize {
    self.next as usize
  }
}

impl SpatialNode {
  /// Create a childless cell with no obstacle references.
  pub(crate) fn new(id: LeafId, bounds: Bounds) -> Self {
    Self {
      id,
      bounds,
      children: None,
      obstacles: SmallVec::new(),
    }
  }

  /// Cell id.
  #[inline]
  pub fn id(&self) -> LeafId {
    self.id
  }

  /// Cell bounds.
  #[inline]
  pub fn bounds(&self) -> &Bounds {
    &self.bounds
  }

  /// True when the cell has no children.
  #[inline]
  pub fn is_leaf(&self) -> bool {
    self.children.is_none()
  }

  /// Children in octant order, if subdivided.
  #[inline]
  pub fn children(&self) -> Option<&[SpatialNode; 8]> {
    self.children.as_deref()
  }

  pub(crate) fn children_mut(&mut self) -> Option<&mut [SpatialNode; 8]> {
    self.children.as_deref_mut()
  }

  /// Obstacles recorded on this cell.
  #[inline]
  pub fn obstacles(&self) -> &[ObstacleId] {
    &self.obstacles
  }

  /// Leaf holds at least one obstacle reference.
  #[inline]
  pub fn is_broad_phase_blocked(&self) -> bool {
    self.is_leaf() && !self.obstacles.is_empty()
  }

  pub(crate) fn record_obstacle(&mut self, obstacle: ObstacleId) {
    self.obstacles.push(obstacle);
  }

  /// Create the 8 children if absent. Returns true if they were created.
  pub(crate) fn subdivide(&mut self, ids: &mut NodeIdAllocator) -> bool {
    if self.children.is_some() {
      return false;
    }
    let bounds = self.bounds;
    let children: [SpatialNode; 8] =
      std::array::from_fn(|octant| SpatialNode::new(ids.next(), bounds.octant(octant as u8)));
    self.children = Some(Box::new(children));
    true
  }

  /// Visit every leaf depth-first in octant order.
  pub fn for_each_leaf<'a>(&'a self, visit: &mut impl FnMut(&'a SpatialNode)) {
    match self.children.as_deref() {
      Some(children) => {
        for child in children {
          child.for_each_leaf(visit);
        }
      }
      None => visit(self),
    }
  }

  /// Number of leaves below (and including) this cell.
  pub fn leaf_count(&self) -> usize {
    match self.children.as_deref() {
      Some(children) => children.iter().map(SpatialNode::leaf_count).sum(),
      None => 1,
    }
  }
}

#[cfg(test)]
#[path = "node_test.rs"]
mod node_test;
