//! Tuning constants for tree construction, graph building, search and traffic.
//!
//! # Adjacency Tolerance
//!
//! ```text
//! epsilon = max(EPSILON_FLOOR, min_leaf_size * EPSILON_LEAF_FACTOR)
//! face bucket step = 2 * epsilon
//! adjacency hash cell = ADJACENCY_CELL_FACTOR * min_leaf_size
//! ```

// =============================================================================
// Spatial index
// =============================================================================

/// Default minimum leaf edge length in world units.
pub const DEFAULT_MIN_LEAF_SIZE: f64 = 1.0;

/// Default cap on the number of leaves a single build may create.
pub const DEFAULT_MAX_LEAVES: usize = 2_000_000;

/// Default shrink applied to a leaf before the exact occupancy test.
pub const DEFAULT_OCCUPANCY_SKIN: f64 = 0.05;

/// Relative tolerance for "size is at or below the minimum" comparisons.
pub const SIZE_TOLERANCE: f64 = 1e-9;

/// Number of children of an internal octree node.
pub const OCTANTS: usize = 8;

// =============================================================================
// Graph building
// =============================================================================

/// Lower bound for the adjacency tolerance.
pub const EPSILON_FLOOR: f64 = 0.02;

/// Adjacency tolerance as a fraction of the minimum leaf size.
pub const EPSILON_LEAF_FACTOR: f64 = 0.0025;

/// Adjacency hash cell size as a multiple of the minimum leaf size.
pub const ADJACENCY_CELL_FACTOR: f64 = 1.25;

/// Adjacency tolerance for a given minimum leaf size.
#[inline]
pub fn adjacency_epsilon(min_leaf_size: f64) -> f64 {
  EPSILON_FLOOR.max(min_leaf_size * EPSILON_LEAF_FACTOR)
}

// =============================================================================
// Search
// =============================================================================

/// Default hard cap on node expansions per search.
pub const DEFAULT_MAX_EXPANSIONS: usize = 350_000;

// =============================================================================
// Traffic
// =============================================================================

/// Reservation strength ceiling.
pub const MAX_RESERVATION_STRENGTH: u8 = 8;

/// Default number of leading path leaves reserved by an agent query.
pub const DEFAULT_RESERVED_PREFIX: usize = 6;

/// Default reservation lifetime in seconds.
pub const DEFAULT_RESERVATION_SECONDS: f64 = 2.0;

/// Default penalty per unit of reservation strength.
pub const DEFAULT_PENALTY_MAGNITUDE: f64 = 1.5;

/// Default upper bound (exclusive) of tie-break noise.
pub const DEFAULT_TIE_BREAK_AMPLITUDE: f64 = 0.05;

#[cfg(test)]
#[path = "constants_test.rs"]
mod constants_test;
