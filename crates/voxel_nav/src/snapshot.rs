//! NavSnapshot - one immutable build result (tree + graph).
//!
//! Snapshots are shared through `Arc`. A rebuild produces a new snapshot and
//! swaps the `Arc`; holders of the old one keep a complete, consistent view.

use glam::DVec3;
use web_time::Instant;

use crate::config::IndexConfig;
use crate::error::BuildError;
use crate::graph::{NavGraph, NavGraphBuilder, NavGraphNode};
use crate::octree::{Bounds, ObstacleVolume, OccupancyTest, SpatialIndex};

/// Inputs of one build.
#[derive(Clone, Debug, Default)]
pub struct BuildRequest {
  /// World volume. A build without it is rejected.
  pub world: Option<Bounds>,
  /// Obstacle boxes collected by the caller.
  pub obstacles: Vec<ObstacleVolume>,
}

impl BuildRequest {
  /// Request over `world`.
  pub fn new(world: Bounds, obstacles: Vec<ObstacleVolume>) -> Self {
    Self {
      world: Some(world),
      obstacles,
    }
  }
}

/// Immutable navigation data produced by one build.
#[derive(Debug)]
pub struct NavSnapshot {
  index: SpatialIndex,
  graph: NavGraph,
  build_us: u64,
}

impl NavSnapshot {
  /// Build the tree and graph.
  ///
  /// # Errors
  ///
  /// Any [`BuildError`]; nothing is produced on failure.
  pub fn build(
    request: BuildRequest,
    config: &IndexConfig,
    occupancy: Option<&dyn OccupancyTest>,
  ) -> Result<Self, BuildError> {
    let start = Instant::now();
    let world = request.world.ok_or(BuildError::MissingWorldBounds)?;

    let index = {
      let _span = tracing::info_span!("build_tree").entered();
      SpatialIndex::build(world, &request.obstacles, config)?
    };
    let graph = NavGraphBuilder::new(config)
      .with_occupancy(occupancy)
      .build(&index);
    if graph.is_empty() {
      return Err(BuildError::NoNavigableLeaves);
    }

    let build_us = start.elapsed().as_micros() as u64;
    tracing::info!(
      leaves = index.stats().leaves,
      nodes = graph.len(),
      edges = graph.edge_count(),
      build_us,
      "navigation build complete"
    );

    Ok(Self {
      index,
      graph,
      build_us,
    })
  }

  /// Spatial index.
  #[inline]
  pub fn index(&self) -> &SpatialIndex {
    &self.index
  }

  /// Navigation graph.
  #[inline]
  pub fn graph(&self) -> &NavGraph {
    &self.graph
  }

  /// Wall time of the build in microseconds.
  #[inline]
  pub fn build_us(&self) -> u64 {
    self.build_us
  }

  /// Navigable node whose leaf contains `point`.
  pub fn node_at(&self, point: DVec3) -> Option<&NavGraphNode> {
    let leaf = self.index.locate(point)?;
    let id = self.graph.node_for_leaf(leaf.id())?;
    self.graph.node(id)
  }
}
