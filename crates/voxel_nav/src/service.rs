//! NavService - the engine facade owned by the simulation thread.
//!
//! # Query Flow
//!
//! ```text
//! start, end
//!   -> project_to_navigable      (clamp to world, snap to nearest free leaf)
//!   -> locate leaves             (octree descent)
//!   -> PathSearch                (plain, or with traffic penalty)
//!   -> waypoints                 (start, one boundary crossing per leaf pair, end)
//!   -> reserve prefix            (agent queries only)
//! ```
//!
//! Every query runs on the caller's thread against the current snapshot.
//! Rebuilds, synchronous or background, swap the snapshot wholesale and clear
//! all reservations.

use std::sync::Arc;

use glam::DVec3;
use rand::Rng;
use web_time::Instant;

use crate::config::NavConfig;
use crate::error::{BuildError, ConfigError, QueryError};
use crate::graph::NavGraphNode;
use crate::metrics::NavMetrics;
use crate::octree::OccupancyTest;
use crate::rebuild::{AsyncRebuild, RebuildRequest};
use crate::search::{PathSearch, Termination};
pub use crate::snapshot::{BuildRequest, NavSnapshot};
use crate::traffic::ReservationTable;
use crate::types::{LeafId, NavNodeId, OwnerKey, TeamId};

/// A resolved route.
#[derive(Clone, Debug, PartialEq)]
pub struct PathResult {
  /// Projected start, one crossing point per consecutive leaf pair, then the
  /// projected end (or the closest reachable point to it).
  pub waypoints: Vec<DVec3>,
  /// Leaves visited, start to end.
  pub leaves: Vec<LeafId>,
  /// Graph nodes visited, start to end.
  pub nodes: Vec<NavNodeId>,
  /// The end leaf was reached.
  pub reached_goal: bool,
  /// Search cost including traffic penalties.
  pub cost: f64,
  /// Nodes expanded by the search.
  pub expansions: usize,
  /// Why the search stopped.
  pub termination: Termination,
}

/// Requesting agent for traffic-aware queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Agent {
  team: TeamId,
  owner: OwnerKey,
}

/// Navigation engine.
pub struct NavService {
  config: NavConfig,
  occupancy: Option<Arc<dyn OccupancyTest>>,
  snapshot: Option<Arc<NavSnapshot>>,
  search: PathSearch,
  reservations: ReservationTable,
  now: f64,
  metrics: NavMetrics,
  rebuild: AsyncRebuild,
}

impl NavService {
  /// Create an unbuilt engine.
  ///
  /// # Errors
  ///
  /// Invalid parameters, or `require_occupancy_test` without a test.
  pub fn new(
    config: NavConfig,
    occupancy: Option<Arc<dyn OccupancyTest>>,
  ) -> Result<Self, ConfigError> {
    config.validate()?;
    if config.require_occupancy_test && occupancy.is_none() {
      return Err(ConfigError::MissingOccupancyTest);
    }
    Ok(Self {
      config,
      occupancy,
      snapshot: None,
      search: PathSearch::new(),
      reservations: ReservationTable::new(),
      now: 0.0,
      metrics: NavMetrics::new(),
      rebuild: AsyncRebuild::new(),
    })
  }

  // ===========================================================================
  // State
  // ===========================================================================

  /// Active configuration.
  #[inline]
  pub fn config(&self) -> &NavConfig {
    &self.config
  }

  /// A snapshot is installed.
  #[inline]
  pub fn is_built(&self) -> bool {
    self.snapshot.is_some()
  }

  /// Current snapshot, shareable past the next rebuild.
  #[inline]
  pub fn snapshot(&self) -> Option<Arc<NavSnapshot>> {
    self.snapshot.clone()
  }

  /// Current reservations.
  #[inline]
  pub fn reservations(&self) -> &ReservationTable {
    &self.reservations
  }

  /// Drop every reservation.
  pub fn clear_reservations(&mut self) {
    self.reservations.clear();
  }

  /// Collected metrics.
  #[inline]
  pub fn metrics(&self) -> &NavMetrics {
    &self.metrics
  }

  /// Simulation time used for reservation expiry.
  #[inline]
  pub fn now(&self) -> f64 {
    self.now
  }

  /// Set the simulation time in seconds.
  pub fn set_time(&mut self, now: f64) {
    self.now = now;
  }

  /// Advance the simulation time.
  pub fn advance(&mut self, dt: f64) {
    self.now += dt;
  }

  // ===========================================================================
  // Building
  // ===========================================================================

  /// Build synchronously and install the result.
  ///
  /// Reservations are cleared whatever the outcome. On failure the engine is
  /// left unbuilt.
  pub fn build(&mut self, request: BuildRequest) -> Result<(), BuildError> {
    let result = NavSnapshot::build(request, &self.config.index, self.occupancy.as_deref());
    self.install(result)
  }

  /// Start a background build. Returns `false` if one is already running.
  ///
  /// The current snapshot stays in use until [`Self::poll_rebuild`] swaps it.
  pub fn start_rebuild(&mut self, request: BuildRequest) -> bool {
    self.rebuild.start(RebuildRequest {
      build: request,
      config: self.config.index,
      occupancy: self.occupancy.clone(),
    })
  }

  /// Background build is running.
  #[inline]
  pub fn is_rebuilding(&self) -> bool {
    self.rebuild.is_busy()
  }

  /// Install a finished background build, if any.
  ///
  /// Returns `None` while running or idle; otherwise the build outcome, with
  /// the same effects as [`Self::build`].
  pub fn poll_rebuild(&mut self) -> Option<Result<(), BuildError>> {
    let result = self.rebuild.poll()?;
    Some(self.install(result))
  }

  /// Block until the background build finishes and install it.
  pub fn finish_rebuild(&mut self) -> Option<Result<(), BuildError>> {
    let result = self.rebuild.wait()?;
    Some(self.install(result))
  }

  /// Drop the background build, if any. The current snapshot stays.
  ///
  /// Returns true if a build was pending.
  pub fn cancel_rebuild(&mut self) -> bool {
    let pending = self.rebuild.is_busy();
    self.rebuild.cancel();
    if pending {
      tracing::debug!("background rebuild cancelled");
    }
    pending
  }

  fn install(&mut self, result: Result<NavSnapshot, BuildError>) -> Result<(), BuildError> {
    self.reservations.clear();
    match result {
      Ok(snapshot) => {
        let stats = snapshot.index().stats();
        self.metrics.record_build(
          snapshot.build_us(),
          stats.leaves,
          snapshot.graph().len(),
          snapshot.graph().edge_count(),
        );
        self.snapshot = Some(Arc::new(snapshot));
        Ok(())
      }
      Err(error) => {
        tracing::warn!(%error, "navigation build rejected");
        self.metrics.record_failed_build();
        self.snapshot = None;
        Err(error)
      }
    }
  }

  // ===========================================================================
  // Queries
  // ===========================================================================

  /// Nearest navigable point to `point`.
  ///
  /// Points in a navigable leaf (after clamping to the world) are returned
  /// as-is. Otherwise the result is the closest point of the nearest
  /// navigable leaf, nudged inside it.
  pub fn project_to_navigable(&self, point: DVec3) -> Option<DVec3> {
    project(self.snapshot.as_deref()?, point)
  }

  /// Shortest path between two points.
  pub fn find_path(&mut self, start: DVec3, end: DVec3) -> Result<PathResult, QueryError> {
    self.route(start, end, None)
  }

  /// Traffic-aware path for an agent.
  ///
  /// Expired reservations are swept first. The search pays the entry penalty
  /// of other agents' reservations, and the first leaves of the returned path
  /// are reserved for `owner`, whether or not the goal was reached.
  pub fn find_path_for_agent(
    &mut self,
    start: DVec3,
    end: DVec3,
    team: TeamId,
    owner: OwnerKey,
  ) -> Result<PathResult, QueryError> {
    self.route(start, end, Some(Agent { team, owner }))
  }

  /// Center of a uniformly chosen navigable leaf.
  pub fn random_navigable_position<R: Rng>(&self, rng: &mut R) -> Option<DVec3> {
    let graph = self.snapshot.as_deref()?.graph();
    if graph.is_empty() {
      return None;
    }
    let index = rng.random_range(0..graph.len());
    Some(graph.nodes()[index].bounds().center)
  }

  fn route(
    &mut self,
    start: DVec3,
    end: DVec3,
    agent: Option<Agent>,
  ) -> Result<PathResult, QueryError> {
    let snapshot = self.snapshot.clone().ok_or(QueryError::NotBuilt)?;
    let graph = snapshot.graph();

    let start_point = project(&snapshot, start).ok_or(QueryError::Unprojectable(start))?;
    let end_point = project(&snapshot, end).ok_or(QueryError::Unprojectable(end))?;
    let start_node = snapshot
      .node_at(start_point)
      .ok_or(QueryError::NoLeaf(start_point))?
      .id();
    let goal_node = snapshot
      .node_at(end_point)
      .ok_or(QueryError::NoLeaf(end_point))?
      .id();

    let timer = Instant::now();
    let now = self.now;
    let traffic = self.config.traffic;
    let mut swept = 0;
    let outcome = match agent {
      None => self
        .search
        .search(graph, start_node, goal_node, &self.config.search),
      Some(agent) => {
        swept = self.reservations.sweep_expired(now);
        let reservations = &self.reservations;
        self.search.search_with_penalty(
          graph,
          start_node,
          goal_node,
          &self.config.search,
          |node: &NavGraphNode| {
            reservations.entry_penalty(node.leaf(), agent.team, agent.owner, now, &traffic)
          },
        )
      }
    };
    let search_us = timer.elapsed().as_micros() as u64;
    self
      .metrics
      .record_search(search_us, outcome.expansions, outcome.termination);

    let nodes = graph.nodes();
    let leaves: Vec<LeafId> = outcome
      .nodes
      .iter()
      .map(|id| nodes[id.index()].leaf())
      .collect();

    let mut waypoints = Vec::with_capacity(outcome.nodes.len() + 1);
    waypoints.push(start_point);
    for pair in outcome.nodes.windows(2) {
      let a = nodes[pair[0].index()].bounds();
      let b = nodes[pair[1].index()].bounds();
      waypoints.push(a.shared_region_center(b));
    }
    if outcome.reached_goal {
      waypoints.push(end_point);
    } else if let Some(last) = outcome.nodes.last() {
      waypoints.push(nodes[last.index()].bounds().closest_point(end_point));
    }

    if let Some(agent) = agent {
      let written =
        self
          .reservations
          .reserve_prefix(&leaves, agent.team, agent.owner, now, &traffic);
      self.metrics.record_reservations(written, swept);
    }

    tracing::trace!(
      nodes = outcome.nodes.len(),
      reached_goal = outcome.reached_goal,
      cost = outcome.cost,
      expansions = outcome.expansions,
      search_us,
      agent = agent.is_some(),
      "path query"
    );

    Ok(PathResult {
      waypoints,
      leaves,
      nodes: outcome.nodes,
      reached_goal: outcome.reached_goal,
      cost: outcome.cost,
      expansions: outcome.expansions,
      termination: outcome.termination,
    })
  }
}

impl std::fmt::Debug for NavService {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("NavService")
      .field("config", &self.config)
      .field("occupancy", &self.occupancy.is_some())
      .field("built", &self.is_built())
      .field("reservations", &self.reservations.len())
      .field("now", &self.now)
      .field("rebuild", &self.rebuild)
      .finish()
  }
}

/// Clamp to the world, then snap into the nearest navigable leaf.
fn project(snapshot: &NavSnapshot, point: DVec3) -> Option<DVec3> {
  if !point.is_finite() {
    return None;
  }
  let clamped = snapshot.index().world_bounds().closest_point(point);
  if snapshot.node_at(clamped).is_some() {
    return Some(clamped);
  }

  // Linear scan; ties go to the lowest node id
  let graph = snapshot.graph();
  let nearest = graph.nodes().iter().min_by(|a, b| {
    a.bounds()
      .distance_squared_to(clamped)
      .total_cmp(&b.bounds().distance_squared_to(clamped))
  })?;

  let bounds = nearest.bounds();
  let inset = DVec3::splat(graph.epsilon()).min(bounds.half_extents * 0.5);
  Some(
    bounds
      .closest_point(clamped)
      .clamp(bounds.min() + inset, bounds.max() - inset),
  )
}

#[cfg(test)]
#[path = "service_test.rs"]
mod service_test;
