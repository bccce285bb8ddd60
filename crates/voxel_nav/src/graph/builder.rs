//! NavGraphBuilder - turns octree leaves into a connectivity graph.
//!
//! # Pipeline
//!
//! ```text
//! leaves (depth-first, octant order)
//!   -> drop blocked leaves            (broad phase + optional occupancy test)
//!   -> NavGraphNode per leaf          (ids dense, in collection order)
//!   -> face pass                      (face contacts, any size ratio)
//!   -> adjacency-hash pass            (edge/corner contacts, similar sizes)
//!   -> EdgeSet                        (canonical, deduplicated)
//!   -> neighbor lists
//! ```
//!
//! Candidate gathering runs in parallel; insertion into the edge set is
//! sequential in leaf order, so the same input always yields the same graph.

use std::collections::HashMap;

use web_time::Instant;

use super::adjacency_pass::adjacency_pass;
use super::edges::EdgeSet;
use super::face_pass::face_pass;
use super::node::NavGraphNode;
use super::{GraphStats, NavGraph};
use crate::config::IndexConfig;
use crate::constants::{adjacency_epsilon, ADJACENCY_CELL_FACTOR};
use crate::octree::occupancy::confirm_blocked;
use crate::octree::{Bounds, OccupancyTest, SpatialIndex};
use crate::types::{LeafId, NavNodeId};

/// One leaf as seen by the graph builder.
#[derive(Clone, Copy, Debug)]
pub struct LeafRecord {
  /// Leaf id.
  pub leaf: LeafId,
  /// Leaf bounds.
  pub bounds: Bounds,
  /// Leaf holds at least one obstacle reference.
  pub broad_phase_blocked: bool,
}

impl LeafRecord {
  /// Free leaf.
  pub fn open(leaf: LeafId, bounds: Bounds) -> Self {
    Self {
      leaf,
      bounds,
      broad_phase_blocked: false,
    }
  }

  /// Leaf with an obstacle reference.
  pub fn blocked(leaf: LeafId, bounds: Bounds) -> Self {
    Self {
      leaf,
      bounds,
      broad_phase_blocked: true,
    }
  }
}

/// Builds a [`NavGraph`] from an index or an explicit leaf list.
#[derive(Clone, Copy)]
pub struct NavGraphBuilder<'a> {
  min_leaf_size: f64,
  occupancy_skin: f64,
  occupancy: Option<&'a dyn OccupancyTest>,
}

impl<'a> NavGraphBuilder<'a> {
  /// Builder using the tolerances of `config`.
  pub fn new(config: &IndexConfig) -> Self {
    Self {
      min_leaf_size: config.min_leaf_size,
      occupancy_skin: config.occupancy_skin,
      occupancy: None,
    }
  }

  /// Confirm broad-phase hits with an exact occupancy test.
  pub fn with_occupancy(mut self, occupancy: Option<&'a dyn OccupancyTest>) -> Self {
    self.occupancy = occupancy;
    self
  }

  /// Tolerance used for contact tests.
  #[inline]
  pub fn epsilon(&self) -> f64 {
    adjacency_epsilon(self.min_leaf_size)
  }

  /// Build over every leaf of `index`.
  ///
  /// Blocked state comes from [`SpatialIndex::is_leaf_blocked`] with this
  /// builder's occupancy test.
  pub fn build(&self, index: &SpatialIndex) -> NavGraph {
    let leaves: Vec<(LeafRecord, bool)> = {
      let _span = tracing::info_span!("collect_leaves").entered();
      index
        .leaves()
        .into_iter()
        .map(|leaf| {
          let record = LeafRecord {
            leaf: leaf.id(),
            bounds: *leaf.bounds(),
            broad_phase_blocked: leaf.is_broad_phase_blocked(),
          };
          (record, index.is_leaf_blocked(leaf, self.occupancy))
        })
        .collect()
    };
    self.assemble(leaves)
  }

  /// Build over an explicit leaf list.
  ///
  /// Leaves should partition a volume without overlap; order determines node
  /// ids. Broad-phase blocked leaves are confirmed by the occupancy test on
  /// the leaf shrunk by the skin.
  pub fn build_from_leaves(&self, leaves: impl IntoIterator<Item = LeafRecord>) -> NavGraph {
    self.assemble(leaves.into_iter().map(|record| {
      let blocked = record.broad_phase_blocked
        && confirm_blocked(&record.bounds, self.occupancy_skin, self.occupancy);
      (record, blocked)
    }))
  }

  /// Nodes and edges from leaves with their final blocked state.
  #[tracing::instrument(skip_all, name = "graph::build")]
  fn assemble(&self, leaves: impl IntoIterator<Item = (LeafRecord, bool)>) -> NavGraph {
    let start = Instant::now();
    let epsilon = self.epsilon();

    let mut stats = GraphStats::default();
    let mut nodes = Vec::new();
    let mut by_leaf = HashMap::new();
    for (record, blocked) in leaves {
      stats.leaves += 1;
      if blocked {
        stats.blocked += 1;
        continue;
      }
      let id = NavNodeId(nodes.len() as u32);
      by_leaf.insert(record.leaf, id);
      nodes.push(NavGraphNode::new(id, record.leaf, record.bounds));
    }

    let bounds: Vec<Bounds> = nodes.iter().map(|node| *node.bounds()).collect();
    let mut edges = EdgeSet::with_capacity(nodes.len() * 4);

    {
      let _span = tracing::info_span!("face_pass").entered();
      for (a, b) in face_pass(&bounds, epsilon) {
        if let Some(edge) = edges.insert(NavNodeId(a), NavNodeId(b)) {
          nodes[edge.low().index()].neighbors.push(edge.high());
          nodes[edge.high().index()].neighbors.push(edge.low());
        }
      }
      stats.face_edges = edges.len();
    }

    {
      let _span = tracing::info_span!("adjacency_pass").entered();
      let cell = self.min_leaf_size * ADJACENCY_CELL_FACTOR;
      for (a, b) in adjacency_pass(&bounds, cell, epsilon) {
        if let Some(edge) = edges.insert(NavNodeId(a), NavNodeId(b)) {
          nodes[edge.low().index()].neighbors.push(edge.high());
          nodes[edge.high().index()].neighbors.push(edge.low());
        }
      }
      stats.adjacency_edges = edges.len() - stats.face_edges;
    }

    stats.navigable = nodes.len();
    stats.build_us = start.elapsed().as_micros() as u64;

    tracing::debug!(
      leaves = stats.leaves,
      navigable = stats.navigable,
      face_edges = stats.face_edges,
      adjacency_edges = stats.adjacency_edges,
      build_us = stats.build_us,
      "navigation graph built"
    );

    NavGraph {
      nodes,
      edges: edges.into_edges(),
      by_leaf,
      epsilon,
      stats,
    }
  }
}

impl std::fmt::Debug for NavGraphBuilder<'_> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("NavGraphBuilder")
      .field("min_leaf_size", &self.min_leaf_size)
      .field("occupancy_skin", &self.occupancy_skin)
      .field("occupancy", &self.occupancy.is_some())
      .finish()
  }
}

#[cfg(test)]
#[path = "builder_test.rs"]
mod builder_test;
