//! Test fixtures shared across modules.
//!
//! Grid leaf lists, graphs and ready-built services for exercising search,
//! traffic and the service facade without repeating setup.

use glam::{DVec3, UVec3};

use crate::config::{IndexConfig, NavConfig};
use crate::graph::{LeafRecord, NavGraph, NavGraphBuilder};
use crate::octree::{Bounds, ObstacleVolume};
use crate::service::{BuildRequest, NavService};
use crate::types::{LeafId, NavNodeId};

// =============================================================================
// Leaf lists
// =============================================================================

/// Unit cell with its min corner at `(x, y, z)`.
pub fn unit_cell(x: u32, y: u32, z: u32) -> Bounds {
  let min = DVec3::new(x as f64, y as f64, z as f64);
  Bounds::from_min_max(min, min + DVec3::ONE)
}

/// Leaf id of grid cell `(x, y, z)` in x-fastest order.
pub fn grid_leaf_id(dims: UVec3, x: u32, y: u32, z: u32) -> LeafId {
  LeafId(x + y * dims.x + z * dims.x * dims.y)
}

/// Unit-cell leaves filling `dims`, x-fastest, blocked where `blocked` says.
pub fn grid_records(dims: UVec3, blocked: impl Fn(u32, u32, u32) -> bool) -> Vec<LeafRecord> {
  let mut records = Vec::with_capacity((dims.x * dims.y * dims.z) as usize);
  for z in 0..dims.z {
    for y in 0..dims.y {
      for x in 0..dims.x {
        let id = grid_leaf_id(dims, x, y, z);
        let bounds = unit_cell(x, y, z);
        records.push(if blocked(x, y, z) {
          LeafRecord::blocked(id, bounds)
        } else {
          LeafRecord::open(id, bounds)
        });
      }
    }
  }
  records
}

/// Graph over a unit grid.
pub fn grid_graph(dims: UVec3, blocked: impl Fn(u32, u32, u32) -> bool) -> NavGraph {
  let config = IndexConfig::DEFAULT.with_min_leaf_size(1.0);
  NavGraphBuilder::new(&config).build_from_leaves(grid_records(dims, blocked))
}

/// Graph node of grid cell `(x, y, z)`. Panics if the cell is blocked.
pub fn grid_node(graph: &NavGraph, dims: UVec3, x: u32, y: u32, z: u32) -> NavNodeId {
  graph
    .node_for_leaf(grid_leaf_id(dims, x, y, z))
    .unwrap_or_else(|| panic!("cell ({x}, {y}, {z}) is not navigable"))
}

/// Consecutive nodes share an edge.
pub fn assert_connected(graph: &NavGraph, path: &[NavNodeId]) {
  for pair in path.windows(2) {
    assert!(
      graph.are_neighbors(pair[0], pair[1]),
      "{:?} and {:?} are not adjacent",
      pair[0],
      pair[1]
    );
  }
}

// =============================================================================
// Services
// =============================================================================

/// Cube world from `min` to `max` on every axis.
pub fn cube(min: f64, max: f64) -> Bounds {
  Bounds::from_min_max(DVec3::splat(min), DVec3::splat(max))
}

/// Unit obstacle with its min corner at `(x, y, z)`.
pub fn unit_obstacle(x: u32, y: u32, z: u32) -> ObstacleVolume {
  ObstacleVolume::new(unit_cell(x, y, z))
}

/// Service built over an `extent`³ world with full unit subdivision.
pub fn built_service(extent: f64, obstacles: Vec<ObstacleVolume>, config: NavConfig) -> NavService {
  let mut service = NavService::new(config, None).expect("valid config");
  service
    .build(BuildRequest::new(cube(0.0, extent), obstacles))
    .expect("build succeeds");
  service
}

/// Full unit-subdivision configuration.
pub fn full_unit_config() -> NavConfig {
  NavConfig {
    index: IndexConfig::FULL.with_min_leaf_size(1.0),
    ..NavConfig::default()
  }
}
