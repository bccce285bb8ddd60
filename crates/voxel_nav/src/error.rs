//! Error types for building and querying the navigation engine.

use glam::DVec3;

/// Reasons a build is rejected.
///
/// A rejected build is never partially applied: the engine is left in the
/// "not built" state and the caller may retry with different parameters.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum BuildError {
  /// No world bounds were supplied.
  #[error("world bounds are missing")]
  MissingWorldBounds,

  /// World bounds have a non-positive or non-finite extent.
  #[error("world bounds are degenerate: center {center:?}, half extents {half_extents:?}")]
  DegenerateWorldBounds {
    /// Supplied center.
    center: DVec3,
    /// Supplied half extents.
    half_extents: DVec3,
  },

  /// Minimum leaf size is not a positive finite number.
  #[error("minimum leaf size must be positive and finite, got {0}")]
  InvalidMinLeafSize(f64),

  /// Subdivision would exceed the leaf safety cap.
  #[error("build would create {count} leaves, cap is {cap}")]
  TooManyLeaves {
    /// Leaves created (or predicted) when the cap was hit.
    count: usize,
    /// Configured cap.
    cap: usize,
  },

  /// Every leaf is blocked; there is no graph to search.
  #[error("build produced no navigable leaves")]
  NoNavigableLeaves,
}

/// Reasons a path or projection query finds nothing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum QueryError {
  /// No successful build is installed.
  #[error("navigation graph is not built")]
  NotBuilt,

  /// The point could not be projected onto a navigable leaf.
  #[error("point {0:?} cannot be projected onto a navigable leaf")]
  Unprojectable(DVec3),

  /// The projected point does not resolve to a graph node.
  #[error("no navigable leaf at {0:?}")]
  NoLeaf(DVec3),
}

/// Invalid engine construction arguments.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
  /// Mesh-accurate validation was requested without an occupancy test.
  #[error("occupancy validation is required but no occupancy test was supplied")]
  MissingOccupancyTest,

  /// A numeric parameter is out of range.
  #[error("invalid parameter `{name}`: {reason}")]
  InvalidParameter {
    /// Parameter name.
    name: &'static str,
    /// What is wrong with it.
    reason: String,
  },
}
