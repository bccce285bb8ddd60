//! SpatialIndex - owns the octree root and builds it from obstacles.
//!
//! # Build Modes
//!
//! - **Full**: subdivide every cell to the minimum size, then insert each
//!   obstacle into the finished tree (recursing into intersecting children and
//!   recording the obstacle at leaves).
//! - **Adaptive**: subdivide lazily while inserting each obstacle, only into
//!   children the obstacle intersects. If an obstacle intersects a cell but
//!   none of its children (floating-point edge cases), it is recorded on the
//!   internal cell. Leaf collection never looks at internal cells, so such a
//!   record has no effect on navigability.
//!
//! The leaf count is tracked during construction; crossing the configured cap
//! aborts the build before anything is published.

use glam::DVec3;

use super::node::NodeIdAllocator;
use super::occupancy::confirm_blocked;
use super::{Bounds, ObstacleVolume, OccupancyTest, SpatialNode};
use crate::config::{IndexConfig, SubdivisionMode};
use crate::constants::{OCTANTS, SIZE_TOLERANCE};
use crate::error::BuildError;
use crate::types::ObstacleId;

/// Counters collected while building the tree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IndexStats {
  /// Total cells (internal + leaf).
  pub cells: usize,
  /// Leaf cells.
  pub leaves: usize,
  /// Leaves holding at least one obstacle reference.
  pub broad_phase_blocked: usize,
  /// Obstacle records placed on internal cells by the adaptive fallback.
  pub internal_records: usize,
}

/// Octree over the world volume.
#[derive(Debug)]
pub struct SpatialIndex {
  root: SpatialNode,
  config: IndexConfig,
  stats: IndexStats,
}

/// Mutable state threaded through the recursive build.
struct BuildContext<'a> {
  ids: NodeIdAllocator,
  leaves: usize,
  internal_records: usize,
  config: &'a IndexConfig,
}

impl BuildContext<'_> {
  #[inline]
  fn is_min_size(&self, bounds: &Bounds) -> bool {
    bounds.largest_extent() <= self.config.min_leaf_size * (1.0 + SIZE_TOLERANCE)
  }

  /// Subdivide `node` if it has no children, keeping the leaf count in check.
  fn subdivide(&mut self, node: &mut SpatialNode) -> Result<(), BuildError> {
    if node.subdivide(&mut self.ids) {
      // One leaf becomes eight
      self.leaves += OCTANTS - 1;
      if self.leaves > self.config.max_leaves {
        return Err(BuildError::TooManyLeaves {
          count: self.leaves,
          cap: self.config.max_leaves,
        });
      }
    }
    Ok(())
  }

  fn subdivide_full(&mut self, node: &mut SpatialNode) -> Result<(), BuildError> {
    if self.is_min_size(node.bounds()) {
      return Ok(());
    }
    self.subdivide(node)?;
    if let Some(children) = node.children_mut() {
      for child in children.iter_mut() {
        self.subdivide_full(child)?;
      }
    }
    Ok(())
  }

  fn insert_full(node: &mut SpatialNode, id: ObstacleId, obstacle: &ObstacleVolume) {
    if !obstacle.intersects(node.bounds()) {
      return;
    }
    match node.children_mut() {
      Some(children) => {
        for child in children.iter_mut() {
          Self::insert_full(child, id, obstacle);
        }
      }
      None => node.record_obstacle(id),
    }
  }

  fn insert_adaptive(
    &mut self,
    node: &mut SpatialNode,
    id: ObstacleId,
    obstacle: &ObstacleVolume,
  ) -> Result<(), BuildError> {
    if !obstacle.intersects(node.bounds()) {
      return Ok(());
    }
    if self.is_min_size(node.bounds()) {
      node.record_obstacle(id);
      return Ok(());
    }

    self.subdivide(node)?;

    let mut hit_child = false;
    if let Some(children) = node.children_mut() {
      for child in children.iter_mut() {
        if obstacle.intersects(child.bounds()) {
          hit_child = true;
          self.insert_adaptive(child, id, obstacle)?;
        }
      }
    }

    if !hit_child {
      node.record_obstacle(id);
      self.internal_records += 1;
    }
    Ok(())
  }
}

/// Number of halvings needed before `extent` is at or below `min_leaf_size`.
fn full_depth(extent: f64, min_leaf_size: f64) -> u32 {
  let mut depth = 0;
  let mut size = extent;
  while size > min_leaf_size * (1.0 + SIZE_TOLERANCE) {
    size *= 0.5;
    depth += 1;
  }
  depth
}

impl SpatialIndex {
  /// Build the tree over `world` from `obstacles`.
  ///
  /// Obstacles are only read during the build; cells keep their indices.
  ///
  /// # Errors
  ///
  /// Rejects degenerate world bounds, a non-positive minimum leaf size, and
  /// trees that would exceed `config.max_leaves`.
  pub fn build(
    world: Bounds,
    obstacles: &[ObstacleVolume],
    config: &IndexConfig,
  ) -> Result<Self, BuildError> {
    if world.is_degenerate() {
      return Err(BuildError::DegenerateWorldBounds {
        center: world.center,
        half_extents: world.half_extents,
      });
    }
    if !(config.min_leaf_size.is_finite() && config.min_leaf_size > 0.0) {
      return Err(BuildError::InvalidMinLeafSize(config.min_leaf_size));
    }

    let mut ctx = BuildContext {
      ids: NodeIdAllocator::default(),
      leaves: 1,
      internal_records: 0,
      config,
    };
    let mut root = SpatialNode::new(ctx.ids.next(), world);

    match config.mode {
      SubdivisionMode::Full => {
        let depth = full_depth(world.largest_extent(), config.min_leaf_size);
        let predicted = 8usize.checked_pow(depth).unwrap_or(usize::MAX);
        if predicted > config.max_leaves {
          return Err(BuildError::TooManyLeaves {
            count: predicted,
            cap: config.max_leaves,
          });
        }

        let _span = tracing::info_span!("subdivide_full", depth).entered();
        ctx.subdivide_full(&mut root)?;
        for (index, obstacle) in obstacles.iter().enumerate() {
          BuildContext::insert_full(&mut root, ObstacleId(index as u32), obstacle);
        }
      }
      SubdivisionMode::Adaptive => {
        let _span = tracing::info_span!("subdivide_adaptive").entered();
        for (index, obstacle) in obstacles.iter().enumerate() {
          ctx.insert_adaptive(&mut root, ObstacleId(index as u32), obstacle)?;
        }
      }
    }

    let mut broad_phase_blocked = 0;
    root.for_each_leaf(&mut |leaf| {
      if leaf.is_broad_phase_blocked() {
        broad_phase_blocked += 1;
      }
    });

    let stats = IndexStats {
      cells: ctx.ids.allocated(),
      leaves: ctx.leaves,
      broad_phase_blocked,
      internal_records: ctx.internal_records,
    };

    if stats.internal_records > 0 {
      tracing::debug!(
        internal_records = stats.internal_records,
        "obstacles recorded on internal cells (ignored by leaf collection)"
      );
    }

    Ok(Self {
      root,
      config: *config,
      stats,
    })
  }

  /// Root cell.
  #[inline]
  pub fn root(&self) -> &SpatialNode {
    &self.root
  }

  /// World bounds.
  #[inline]
  pub fn world_bounds(&self) -> &Bounds {
    self.root.bounds()
  }

  /// Configuration used for this build.
  #[inline]
  pub fn config(&self) -> &IndexConfig {
    &self.config
  }

  /// Build counters.
  #[inline]
  pub fn stats(&self) -> &IndexStats {
    &self.stats
  }

  /// All leaves, depth-first in octant order.
  pub fn leaves(&self) -> Vec<&SpatialNode> {
    let mut leaves = Vec::with_capacity(self.stats.leaves);
    self.root.for_each_leaf(&mut |leaf| leaves.push(leaf));
    leaves
  }

  /// Leaf containing `point`, or `None` outside the world.
  ///
  /// Points on a shared face resolve to the upper cell.
  pub fn locate(&self, point: DVec3) -> Option<&SpatialNode> {
    if !self.root.bounds().contains_point(point) {
      return None;
    }
    let mut node = &self.root;
    while let Some(children) = node.children() {
      node = &children[node.bounds().octant_of(point) as usize];
    }
    Some(node)
  }

  /// Final blocked state of a leaf.
  ///
  /// Broad-phase blocked leaves are confirmed by `occupancy` (on the leaf
  /// shrunk by the skin) when one is supplied.
  pub fn is_leaf_blocked(&self, leaf: &SpatialNode, occupancy: Option<&dyn OccupancyTest>) -> bool {
    leaf.is_broad_phase_blocked()
      && confirm_blocked(leaf.bounds(), self.config.occupancy_skin, occupancy)
  }
}

#[cfg(test)]
#[path = "index_test.rs"]
mod index_test;
