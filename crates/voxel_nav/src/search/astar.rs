//! PathSearch - A* over the navigation graph with reusable scratch state.
//!
//! Heuristic and base edge cost are Euclidean distances between leaf
//! centers. An optional entry penalty is added when relaxing into a neighbor.
//! With penalties or an expansion cap in effect the result is not guaranteed
//! to be optimal.
//!
//! If the goal is never popped, the search returns the path to the
//! best-so-far node: the discovered node with the smallest heuristic, ties
//! broken by the smaller `f`. The start is always discovered, so the path is
//! never empty.

use super::open_set::OpenSet;
use super::scratch::ScratchTable;
use crate::config::SearchConfig;
use crate::graph::{NavGraph, NavGraphNode};
use crate::types::NavNodeId;

/// Why a search stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Termination {
  /// The goal was popped from the open set.
  ReachedGoal,
  /// The open set ran empty; the goal is unreachable.
  Exhausted,
  /// The expansion cap was hit.
  IterationCap,
}

/// Result of one search.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchOutcome {
  /// Start to goal (or to the best-so-far node), inclusive.
  pub nodes: Vec<NavNodeId>,
  /// Last node is the goal.
  pub reached_goal: bool,
  /// Accumulated cost (distance plus penalties) to the last node.
  pub cost: f64,
  /// Nodes expanded.
  pub expansions: usize,
  /// Stop reason.
  pub termination: Termination,
}

impl SearchOutcome {
  fn empty() -> Self {
    Self {
      nodes: Vec::new(),
      reached_goal: false,
      cost: 0.0,
      expansions: 0,
      termination: Termination::Exhausted,
    }
  }
}

/// Reusable A* engine.
///
/// Keeps its scratch table and heap between searches; one instance serves any
/// number of queries on one thread.
#[derive(Debug, Default)]
pub struct PathSearch {
  scratch: ScratchTable,
  open: OpenSet,
}

#[inline]
fn sanitize_penalty(penalty: f64) -> f64 {
  if penalty.is_nan() || penalty < 0.0 {
    0.0
  } else {
    penalty
  }
}

impl PathSearch {
  /// Fresh engine with empty scratch.
  pub fn new() -> Self {
    Self::default()
  }

  /// Scratch table (for inspection).
  #[inline]
  pub fn scratch(&self) -> &ScratchTable {
    &self.scratch
  }

  /// Plain shortest-path search.
  pub fn search(
    &mut self,
    graph: &NavGraph,
    start: NavNodeId,
    goal: NavNodeId,
    config: &SearchConfig,
  ) -> SearchOutcome {
    self.search_with_penalty(graph, start, goal, config, |_| 0.0)
  }

  /// Search with an entry penalty added when moving into a node.
  ///
  /// Negative and NaN penalties count as zero.
  pub fn search_with_penalty<P>(
    &mut self,
    graph: &NavGraph,
    start: NavNodeId,
    goal: NavNodeId,
    config: &SearchConfig,
    mut penalty: P,
  ) -> SearchOutcome
  where
    P: FnMut(&NavGraphNode) -> f64,
  {
    let nodes = graph.nodes();
    let (Some(start_node), Some(goal_node)) = (graph.node(start), graph.node(goal)) else {
      return SearchOutcome::empty();
    };
    let goal_center = goal_node.bounds().center;
    let heuristic = |node: &NavGraphNode| node.bounds().center.distance(goal_center);

    self.scratch.begin(nodes.len());
    self.open.clear();

    let start_h = heuristic(start_node);
    self.scratch.update(start, 0.0, start_h, None);
    self.open.push(start_h, start);

    let mut best = start;
    let mut best_h = start_h;
    let mut best_f = start_h;
    let mut expansions = 0usize;
    let mut termination = Termination::Exhausted;

    while let Some(entry) = self.open.pop() {
      let current = entry.id;
      if self.scratch.is_closed(current) || entry.f > self.scratch.f(current) {
        continue;
      }
      if current == goal {
        termination = Termination::ReachedGoal;
        break;
      }
      if !config.can_expand(expansions) {
        termination = Termination::IterationCap;
        break;
      }
      expansions += 1;
      self.scratch.close(current);

      let current_node = &nodes[current.index()];
      let current_g = self.scratch.g(current);
      let current_center = current_node.bounds().center;

      for &next in current_node.neighbors() {
        if self.scratch.is_closed(next) {
          continue;
        }
        let next_node = &nodes[next.index()];
        let step = current_center.distance(next_node.bounds().center);
        let tentative = current_g + step + sanitize_penalty(penalty(next_node));
        if tentative >= self.scratch.g(next) {
          continue;
        }

        let h = if self.scratch.is_visited(next) {
          self.scratch.h(next)
        } else {
          heuristic(next_node)
        };
        let f = tentative + h;
        self.scratch.update(next, tentative, h, Some(current));
        self.open.push(f, next);

        if h < best_h || (h == best_h && f < best_f) {
          best = next;
          best_h = h;
          best_f = f;
        }
      }
    }

    let reached_goal = termination == Termination::ReachedGoal;
    let target = if reached_goal { goal } else { best };

    if !reached_goal {
      tracing::debug!(
        ?termination,
        expansions,
        open = self.open.len(),
        best = best.raw(),
        best_h,
        "search fell back to best-so-far node"
      );
    }

    SearchOutcome {
      nodes: self.reconstruct(target, nodes.len()),
      reached_goal,
      cost: self.scratch.g(target),
      expansions,
      termination,
    }
  }

  /// Walk parent links from `target` back to the start.
  fn reconstruct(&self, target: NavNodeId, node_count: usize) -> Vec<NavNodeId> {
    let mut path = vec![target];
    let mut current = target;
    while let Some(parent) = self.scratch.parent(current) {
      // Parent links form a tree; the bound only guards against corruption
      if path.len() > node_count {
        break;
      }
      path.push(parent);
      current = parent;
    }
    path.reverse();
    path
  }
}

#[cfg(test)]
#[path = "astar_test.rs"]
mod astar_test;
