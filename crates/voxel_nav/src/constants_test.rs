use super::*;

/// Small leaves fall back to the epsilon floor.
#[test]
fn test_epsilon_floor_for_small_leaves() {
  assert_eq!(adjacency_epsilon(1.0), EPSILON_FLOOR);
  assert_eq!(adjacency_epsilon(0.01), EPSILON_FLOOR);
}

/// Large leaves scale epsilon with the leaf size.
#[test]
fn test_epsilon_scales_for_large_leaves() {
  let eps = adjacency_epsilon(100.0);
  assert!(
    (eps - 0.25).abs() < 1e-12,
    "100 * 0.0025 should be 0.25, got {}",
    eps
  );
}

/// The strength ceiling is part of the reservation contract.
#[test]
fn test_strength_cap_is_8() {
  assert_eq!(MAX_RESERVATION_STRENGTH, 8);
}

#[test]
fn test_default_expansion_cap() {
  assert_eq!(DEFAULT_MAX_EXPANSIONS, 350_000);
}
