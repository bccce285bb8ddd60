//! Engine configuration: tree construction, search limits and traffic shaping.
//!
//! Each section has named presets in the style of a rate-limit budget:
//! pick a preset and override single fields with struct update syntax.

use crate::constants::{
  DEFAULT_MAX_EXPANSIONS, DEFAULT_MAX_LEAVES, DEFAULT_MIN_LEAF_SIZE, DEFAULT_OCCUPANCY_SKIN,
  DEFAULT_PENALTY_MAGNITUDE, DEFAULT_RESERVATION_SECONDS, DEFAULT_RESERVED_PREFIX,
  DEFAULT_TIE_BREAK_AMPLITUDE,
};
use crate::error::ConfigError;

/// How the octree decides where to subdivide.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SubdivisionMode {
  /// Subdivide every cell down to the minimum size, then insert obstacles.
  Full,
  /// Subdivide only where an obstacle requires it.
  #[default]
  Adaptive,
}

/// Spatial index construction parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IndexConfig {
  /// Cells at or below this edge length are never subdivided.
  pub min_leaf_size: f64,
  /// Subdivision strategy.
  pub mode: SubdivisionMode,
  /// Builds that would exceed this many leaves are rejected.
  pub max_leaves: usize,
  /// Shrink applied to a leaf before the exact occupancy test.
  pub occupancy_skin: f64,
}

impl IndexConfig {
  /// Adaptive subdivision with default limits.
  pub const DEFAULT: Self = Self {
    min_leaf_size: DEFAULT_MIN_LEAF_SIZE,
    mode: SubdivisionMode::Adaptive,
    max_leaves: DEFAULT_MAX_LEAVES,
    occupancy_skin: DEFAULT_OCCUPANCY_SKIN,
  };

  /// Full uniform subdivision with default limits.
  pub const FULL: Self = Self {
    mode: SubdivisionMode::Full,
    ..Self::DEFAULT
  };

  /// Same configuration with a different minimum leaf size.
  pub fn with_min_leaf_size(self, min_leaf_size: f64) -> Self {
    Self {
      min_leaf_size,
      ..self
    }
  }

  /// Same configuration with a different subdivision mode.
  pub fn with_mode(self, mode: SubdivisionMode) -> Self {
    Self { mode, ..self }
  }
}

impl Default for IndexConfig {
  fn default() -> Self {
    Self::DEFAULT
  }
}

/// Path search limits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchConfig {
  /// Hard cap on node expansions per search (0 = unlimited).
  pub max_expansions: usize,
}

impl SearchConfig {
  /// Default expansion cap.
  pub const DEFAULT: Self = Self {
    max_expansions: DEFAULT_MAX_EXPANSIONS,
  };

  /// No expansion cap; searches run until the goal or exhaustion.
  pub const UNBOUNDED: Self = Self { max_expansions: 0 };

  /// Check if another expansion is allowed.
  #[inline]
  pub fn can_expand(&self, performed: usize) -> bool {
    self.max_expansions == 0 || performed < self.max_expansions
  }
}

impl Default for SearchConfig {
  fn default() -> Self {
    Self::DEFAULT
  }
}

/// Traffic reservation and penalty parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrafficConfig {
  /// Number of leading path leaves reserved by an agent query.
  pub reserved_prefix: usize,
  /// Reservation lifetime in seconds.
  pub reservation_seconds: f64,
  /// Penalty per unit of reservation strength (negative values act as 0).
  pub penalty_magnitude: f64,
  /// Upper bound (exclusive) of deterministic tie-break noise.
  pub tie_break_amplitude: f64,
  /// Only penalize reservations held by the requester's own team.
  pub penalize_same_team_only: bool,
}

impl TrafficConfig {
  /// Default traffic shaping.
  pub const DEFAULT: Self = Self {
    reserved_prefix: DEFAULT_RESERVED_PREFIX,
    reservation_seconds: DEFAULT_RESERVATION_SECONDS,
    penalty_magnitude: DEFAULT_PENALTY_MAGNITUDE,
    tie_break_amplitude: DEFAULT_TIE_BREAK_AMPLITUDE,
    penalize_same_team_only: true,
  };

  /// Agent queries reserve nothing and pay no penalty or noise.
  pub const DISABLED: Self = Self {
    reserved_prefix: 0,
    reservation_seconds: 0.0,
    penalty_magnitude: 0.0,
    tie_break_amplitude: 0.0,
    penalize_same_team_only: true,
  };

  /// Penalties apply regardless of team.
  pub const ALL_TEAMS: Self = Self {
    penalize_same_team_only: false,
    ..Self::DEFAULT
  };
}

impl Default for TrafficConfig {
  fn default() -> Self {
    Self::DEFAULT
  }
}

/// Complete engine configuration.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct NavConfig {
  /// Spatial index construction.
  pub index: IndexConfig,
  /// Search limits.
  pub search: SearchConfig,
  /// Traffic shaping.
  pub traffic: TrafficConfig,
  /// Builds must validate blocked leaves with an occupancy test.
  pub require_occupancy_test: bool,
}

impl NavConfig {
  /// Check parameter ranges.
  ///
  /// Occupancy presence is checked by the service constructor, which knows
  /// whether a test was supplied.
  pub fn validate(&self) -> Result<(), ConfigError> {
    let index = &self.index;
    if !(index.min_leaf_size.is_finite() && index.min_leaf_size > 0.0) {
      return Err(invalid(
        "index.min_leaf_size",
        format!("must be positive and finite, got {}", index.min_leaf_size),
      ));
    }
    if index.max_leaves == 0 {
      return Err(invalid("index.max_leaves", "must be at least 1".to_string()));
    }
    if !(index.occupancy_skin.is_finite() && index.occupancy_skin >= 0.0) {
      return Err(invalid(
        "index.occupancy_skin",
        format!("must be non-negative, got {}", index.occupancy_skin),
      ));
    }

    let traffic = &self.traffic;
    if !(traffic.reservation_seconds.is_finite() && traffic.reservation_seconds >= 0.0) {
      return Err(invalid(
        "traffic.reservation_seconds",
        format!("must be non-negative, got {}", traffic.reservation_seconds),
      ));
    }
    if !traffic.penalty_magnitude.is_finite() {
      return Err(invalid(
        "traffic.penalty_magnitude",
        format!("must be finite, got {}", traffic.penalty_magnitude),
      ));
    }
    if !(traffic.tie_break_amplitude.is_finite() && traffic.tie_break_amplitude >= 0.0) {
      return Err(invalid(
        "traffic.tie_break_amplitude",
        format!("must be non-negative, got {}", traffic.tie_break_amplitude),
      ));
    }
    Ok(())
  }
}

fn invalid(name: &'static str, reason: String) -> ConfigError {
  ConfigError::InvalidParameter { name, reason }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
