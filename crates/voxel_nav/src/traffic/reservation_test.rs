use super::*;

const RED: TeamId = TeamId(1);
const BLUE: TeamId = TeamId(2);
const ALICE: OwnerKey = OwnerKey(100);
const BOB: OwnerKey = OwnerKey(200);

fn leaves(ids: &[u32]) -> Vec<LeafId> {
  ids.iter().copied().map(LeafId).collect()
}

fn quiet() -> TrafficConfig {
  TrafficConfig {
    tie_break_amplitude: 0.0,
    ..TrafficConfig::DEFAULT
  }
}

// =========================================================================
// reserve_prefix
// =========================================================================

/// Only the configured prefix is reserved.
#[test]
fn test_reserves_prefix_only() {
  let mut table = ReservationTable::new();
  let config = TrafficConfig {
    reserved_prefix: 3,
    ..quiet()
  };
  let written = table.reserve_prefix(&leaves(&[1, 2, 3, 4, 5]), RED, ALICE, 10.0, &config);
  assert_eq!(written, 3);
  assert_eq!(table.len(), 3);
  assert!(table.get(LeafId(4)).is_none());

  let first = table.get(LeafId(1)).unwrap();
  assert_eq!(first.team, RED);
  assert_eq!(first.owner, ALICE);
  assert_eq!(first.strength, 1);
  assert_eq!(first.expiry, 10.0 + config.reservation_seconds);
}

/// Short paths reserve every leaf.
#[test]
fn test_short_path_reserves_all() {
  let mut table = ReservationTable::new();
  let written = table.reserve_prefix(&leaves(&[9]), RED, ALICE, 0.0, &quiet());
  assert_eq!(written, 1);
  assert!(table.get(LeafId(9)).is_some());
}

/// Overlapping claims strengthen the entry but keep the first claimant.
#[test]
fn test_live_entry_is_reinforced() {
  let mut table = ReservationTable::new();
  let config = quiet();
  table.reserve_prefix(&leaves(&[5]), RED, ALICE, 0.0, &config);
  table.reserve_prefix(&leaves(&[5]), BLUE, BOB, 1.0, &config);

  let entry = table.get(LeafId(5)).unwrap();
  assert_eq!(entry.owner, ALICE);
  assert_eq!(entry.team, RED);
  assert_eq!(entry.strength, 2);
  assert_eq!(entry.expiry, 1.0 + config.reservation_seconds);
}

/// Expiry never moves backwards.
#[test]
fn test_expiry_keeps_later_value() {
  let mut table = ReservationTable::new();
  let long = TrafficConfig {
    reservation_seconds: 10.0,
    ..quiet()
  };
  let short = TrafficConfig {
    reservation_seconds: 1.0,
    ..quiet()
  };
  table.reserve_prefix(&leaves(&[5]), RED, ALICE, 0.0, &long);
  table.reserve_prefix(&leaves(&[5]), RED, BOB, 2.0, &short);
  assert_eq!(table.get(LeafId(5)).unwrap().expiry, 10.0);
}

/// Strength saturates at the cap.
#[test]
fn test_strength_is_capped() {
  let mut table = ReservationTable::new();
  for i in 0..20 {
    table.reserve_prefix(&leaves(&[5]), RED, OwnerKey(i), 0.0, &quiet());
  }
  assert_eq!(table.get(LeafId(5)).unwrap().strength, MAX_RESERVATION_STRENGTH);
}

/// An expired entry is replaced, not reinforced.
#[test]
fn test_expired_entry_is_replaced() {
  let mut table = ReservationTable::new();
  let config = quiet();
  table.reserve_prefix(&leaves(&[5]), RED, ALICE, 0.0, &config);
  table.reserve_prefix(&leaves(&[5]), RED, ALICE, 0.5, &config);
  assert_eq!(table.get(LeafId(5)).unwrap().strength, 2);

  let later = 0.5 + config.reservation_seconds;
  table.reserve_prefix(&leaves(&[5]), BLUE, BOB, later, &config);
  let entry = table.get(LeafId(5)).unwrap();
  assert_eq!(entry.owner, BOB);
  assert_eq!(entry.team, BLUE);
  assert_eq!(entry.strength, 1);
}

// =========================================================================
// entry_penalty
// =========================================================================

/// Free leaves, own reservations and expired ones cost only noise.
#[test]
fn test_penalty_noise_only_cases() {
  let mut table = ReservationTable::new();
  let config = quiet();
  table.reserve_prefix(&leaves(&[1]), RED, ALICE, 0.0, &config);

  assert_eq!(table.entry_penalty(LeafId(2), RED, BOB, 0.0, &config), 0.0);
  assert_eq!(table.entry_penalty(LeafId(1), RED, ALICE, 0.0, &config), 0.0);
  let expired = config.reservation_seconds;
  assert_eq!(table.entry_penalty(LeafId(1), RED, BOB, expired, &config), 0.0);
}

/// Same-team-only ignores other teams; the all-teams policy does not.
#[test]
fn test_penalty_team_policy() {
  let mut table = ReservationTable::new();
  table.reserve_prefix(&leaves(&[1]), RED, ALICE, 0.0, &quiet());

  let same_team_only = quiet();
  let all_teams = TrafficConfig {
    penalize_same_team_only: false,
    ..quiet()
  };

  let magnitude = same_team_only.penalty_magnitude;
  assert_eq!(table.entry_penalty(LeafId(1), RED, BOB, 0.0, &same_team_only), magnitude);
  assert_eq!(table.entry_penalty(LeafId(1), BLUE, BOB, 0.0, &same_team_only), 0.0);
  assert_eq!(table.entry_penalty(LeafId(1), BLUE, BOB, 0.0, &all_teams), magnitude);
}

/// Penalty scales with strength; negative magnitude counts as zero.
#[test]
fn test_penalty_scales_with_strength() {
  let mut table = ReservationTable::new();
  let config = quiet();
  for owner in [ALICE, BOB, OwnerKey(300)] {
    table.reserve_prefix(&leaves(&[1]), RED, owner, 0.0, &config);
  }
  let penalty = table.entry_penalty(LeafId(1), RED, OwnerKey(400), 0.0, &config);
  assert_eq!(penalty, config.penalty_magnitude * 3.0);

  let negative = TrafficConfig {
    penalty_magnitude: -5.0,
    ..config
  };
  assert_eq!(table.entry_penalty(LeafId(1), RED, OwnerKey(400), 0.0, &negative), 0.0);
}

/// Noise is added on top and stays below the amplitude.
#[test]
fn test_penalty_includes_noise() {
  let mut table = ReservationTable::new();
  let config = TrafficConfig::DEFAULT;
  table.reserve_prefix(&leaves(&[1]), RED, ALICE, 0.0, &config);

  let free = table.entry_penalty(LeafId(2), RED, BOB, 0.0, &config);
  assert_eq!(free, tie_break_noise(BOB, LeafId(2), config.tie_break_amplitude));
  assert!(free < config.tie_break_amplitude);

  let held = table.entry_penalty(LeafId(1), RED, BOB, 0.0, &config);
  let noise = tie_break_noise(BOB, LeafId(1), config.tie_break_amplitude);
  assert!((held - (config.penalty_magnitude + noise)).abs() < 1e-12);
}

// =========================================================================
// Maintenance
// =========================================================================

/// Sweeping removes exactly the expired entries.
#[test]
fn test_sweep_expired() {
  let mut table = ReservationTable::new();
  let short = TrafficConfig {
    reservation_seconds: 1.0,
    ..quiet()
  };
  let long = TrafficConfig {
    reservation_seconds: 5.0,
    ..quiet()
  };
  table.reserve_prefix(&leaves(&[1, 2]), RED, ALICE, 0.0, &short);
  table.reserve_prefix(&leaves(&[3]), RED, ALICE, 0.0, &long);

  assert_eq!(table.sweep_expired(0.5), 0);
  assert_eq!(table.sweep_expired(1.0), 2);
  assert_eq!(table.len(), 1);
  assert!(table.get(LeafId(3)).is_some());

  table.clear();
  assert!(table.is_empty());
}
