use glam::DVec3;

use super::*;

fn cube(min: f64, max: f64) -> Bounds {
  Bounds::from_min_max(DVec3::splat(min), DVec3::splat(max))
}

fn unit_cell(x: f64, y: f64, z: f64) -> ObstacleVolume {
  let min = DVec3::new(x, y, z);
  ObstacleVolume::new(Bounds::from_min_max(min, min + DVec3::ONE))
}

fn full(min_leaf_size: f64) -> IndexConfig {
  IndexConfig::FULL.with_min_leaf_size(min_leaf_size)
}

fn adaptive(min_leaf_size: f64) -> IndexConfig {
  IndexConfig::DEFAULT.with_min_leaf_size(min_leaf_size)
}

// =========================================================================
// Full subdivision
// =========================================================================

/// 8³ world with unit leaves subdivides into exactly 512 leaves.
#[test]
fn test_full_subdivision_leaf_count() {
  let index = SpatialIndex::build(cube(0.0, 8.0), &[], &full(1.0)).unwrap();
  assert_eq!(index.stats().leaves, 512);
  assert_eq!(index.leaves().len(), 512);
  assert_eq!(index.stats().cells, 1 + 8 + 64 + 512);
  assert_eq!(index.stats().broad_phase_blocked, 0);

  for leaf in index.leaves() {
    assert_eq!(leaf.bounds().size(), DVec3::ONE);
  }
}

/// An obstacle exactly covering one cell blocks only that cell.
#[test]
fn test_full_obstacle_blocks_exact_cell_only() {
  let index =
    SpatialIndex::build(cube(0.0, 8.0), &[unit_cell(3.0, 4.0, 5.0)], &full(1.0)).unwrap();
  assert_eq!(index.stats().broad_phase_blocked, 1);

  let blocked: Vec<_> = index
    .leaves()
    .into_iter()
    .filter(|leaf| leaf.is_broad_phase_blocked())
    .collect();
  assert_eq!(blocked.len(), 1);
  assert_eq!(blocked[0].bounds().min(), DVec3::new(3.0, 4.0, 5.0));
}

/// An obstacle spanning several cells blocks every cell it overlaps.
#[test]
fn test_full_obstacle_spanning_cells() {
  let obstacle = ObstacleVolume::new(Bounds::from_min_max(
    DVec3::new(0.5, 0.5, 0.5),
    DVec3::new(2.5, 1.5, 1.0),
  ));
  let index = SpatialIndex::build(cube(0.0, 8.0), &[obstacle], &full(1.0)).unwrap();
  // x: cells 0,1,2; y: cells 0,1; z: cell 0
  assert_eq!(index.stats().broad_phase_blocked, 6);
}

/// Full mode rejects before allocating when the predicted count is too big.
#[test]
fn test_full_rejects_too_many_leaves() {
  let config = IndexConfig {
    max_leaves: 511,
    ..full(1.0)
  };
  let err = SpatialIndex::build(cube(0.0, 8.0), &[], &config).unwrap_err();
  assert_eq!(
    err,
    BuildError::TooManyLeaves {
      count: 512,
      cap: 511
    }
  );
}

// =========================================================================
// Adaptive subdivision
// =========================================================================

/// No obstacles means no subdivision at all.
#[test]
fn test_adaptive_without_obstacles_is_single_leaf() {
  let index = SpatialIndex::build(cube(0.0, 8.0), &[], &adaptive(1.0)).unwrap();
  assert_eq!(index.stats().leaves, 1);
  assert!(index.root().is_leaf());
}

/// A corner obstacle refines only along the path to the corner.
#[test]
fn test_adaptive_refines_toward_obstacle() {
  let index =
    SpatialIndex::build(cube(0.0, 8.0), &[unit_cell(0.0, 0.0, 0.0)], &adaptive(1.0)).unwrap();

  // Three subdivisions (8 -> 4 -> 2 -> 1), each adding 7 leaves
  assert_eq!(index.stats().leaves, 22);
  assert_eq!(index.leaves().len(), 22);
  assert_eq!(index.stats().broad_phase_blocked, 1);
  assert_eq!(index.stats().internal_records, 0);

  let sizes: Vec<f64> = index.leaves().iter().map(|l| l.bounds().size().x).collect();
  assert_eq!(sizes.iter().filter(|&&s| s == 1.0).count(), 8);
  assert_eq!(sizes.iter().filter(|&&s| s == 2.0).count(), 7);
  assert_eq!(sizes.iter().filter(|&&s| s == 4.0).count(), 7);
}

/// Obstacles outside the world are ignored.
#[test]
fn test_adaptive_ignores_outside_obstacle() {
  let index = SpatialIndex::build(
    cube(0.0, 8.0),
    &[unit_cell(20.0, 20.0, 20.0)],
    &adaptive(1.0),
  )
  .unwrap();
  assert_eq!(index.stats().leaves, 1);
  assert_eq!(index.stats().broad_phase_blocked, 0);
}

/// The leaf cap aborts adaptive builds mid-way.
#[test]
fn test_adaptive_rejects_too_many_leaves() {
  let config = IndexConfig {
    max_leaves: 10,
    ..adaptive(1.0)
  };
  let result = SpatialIndex::build(cube(0.0, 8.0), &[unit_cell(0.0, 0.0, 0.0)], &config);
  assert!(matches!(
    result,
    Err(BuildError::TooManyLeaves { count: 15, cap: 10 })
  ));
}

// =========================================================================
// Validation and lookup
// =========================================================================

#[test]
fn test_rejects_degenerate_world() {
  let flat = Bounds::new(DVec3::ZERO, DVec3::new(1.0, 0.0, 1.0));
  let result = SpatialIndex::build(flat, &[], &adaptive(1.0));
  assert!(matches!(
    result,
    Err(BuildError::DegenerateWorldBounds { .. })
  ));
}

#[test]
fn test_rejects_invalid_min_leaf_size() {
  let result = SpatialIndex::build(cube(0.0, 8.0), &[], &adaptive(0.0));
  assert_eq!(result.unwrap_err(), BuildError::InvalidMinLeafSize(0.0));
}

#[test]
fn test_locate_returns_containing_leaf() {
  let index = SpatialIndex::build(cube(0.0, 8.0), &[], &full(1.0)).unwrap();

  let leaf = index.locate(DVec3::new(2.5, 3.5, 7.5)).unwrap();
  assert_eq!(leaf.bounds().min(), DVec3::new(2.0, 3.0, 7.0));

  // Shared faces resolve to the upper cell
  let leaf = index.locate(DVec3::new(2.0, 0.5, 0.5)).unwrap();
  assert_eq!(leaf.bounds().min(), DVec3::new(2.0, 0.0, 0.0));

  // World corners are inside
  assert!(index.locate(DVec3::ZERO).is_some());
  assert!(index.locate(DVec3::splat(8.0)).is_some());

  assert!(index.locate(DVec3::splat(-0.1)).is_none());
}

/// Without an occupancy test, broad phase decides.
#[test]
fn test_blocked_without_occupancy_test() {
  let index =
    SpatialIndex::build(cube(0.0, 4.0), &[unit_cell(0.0, 0.0, 0.0)], &full(1.0)).unwrap();
  let blocked = index
    .leaves()
    .into_iter()
    .filter(|leaf| index.is_leaf_blocked(leaf, None))
    .count();
  assert_eq!(blocked, 1);
}

/// The obstacle list is only borrowed; cells keep indices into it.
#[test]
fn test_build_borrows_obstacle_list() {
  let obstacles = vec![unit_cell(0.0, 0.0, 0.0), unit_cell(3.0, 3.0, 3.0)];
  let index = SpatialIndex::build(cube(0.0, 4.0), &obstacles, &full(1.0)).unwrap();
  let leaf = index.locate(DVec3::splat(3.5)).unwrap();
  assert_eq!(leaf.obstacles(), &[ObstacleId(1)]);

  let again = SpatialIndex::build(cube(0.0, 4.0), &obstacles, &adaptive(1.0)).unwrap();
  assert_eq!(again.stats().broad_phase_blocked, 2);
  assert_eq!(obstacles.len(), 2);
}

/// The occupancy test can clear a broad-phase hit and sees the shrunk box.
#[test]
fn test_occupancy_test_overrides_broad_phase() {
  let index =
    SpatialIndex::build(cube(0.0, 4.0), &[unit_cell(0.0, 0.0, 0.0)], &full(1.0)).unwrap();
  let skin = index.config().occupancy_skin;

  let never = |_: &Bounds| false;
  let checks_skin = move |region: &Bounds| {
    assert!((region.size().x - (1.0 - 2.0 * skin)).abs() < 1e-12);
    true
  };

  let leaf = index.locate(DVec3::splat(0.5)).unwrap();
  assert!(leaf.is_broad_phase_blocked());
  assert!(!index.is_leaf_blocked(leaf, Some(&never as &dyn OccupancyTest)));
  assert!(index.is_leaf_blocked(leaf, Some(&checks_skin as &dyn OccupancyTest)));

  // Unblocked leaves never consult the test
  let free = index.locate(DVec3::splat(3.5)).unwrap();
  let panics = |_: &Bounds| -> bool { panic!("must not be called for free leaves") };
  assert!(!index.is_leaf_blocked(free, Some(&panics as &dyn OccupancyTest)));
}
