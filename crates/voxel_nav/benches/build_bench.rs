//! Benchmarks for tree and graph construction.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::DVec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use voxel_nav::{
  Bounds, BuildRequest, IndexConfig, NavGraphBuilder, NavSnapshot, ObstacleVolume, SpatialIndex,
};

/// Random unit-to-4-unit boxes scattered through a cube of `extent`.
fn scattered_obstacles(extent: f64, count: usize, seed: u64) -> Vec<ObstacleVolume> {
  let mut rng = StdRng::seed_from_u64(seed);
  (0..count)
    .map(|_| {
      let min = DVec3::new(
        rng.random_range(0.0..extent),
        rng.random_range(0.0..extent),
        rng.random_range(0.0..extent),
      );
      let size = DVec3::new(
        rng.random_range(1.0..4.0),
        rng.random_range(1.0..4.0),
        rng.random_range(1.0..4.0),
      );
      ObstacleVolume::new(Bounds::from_min_max(min, min + size))
    })
    .collect()
}

fn world(extent: f64) -> Bounds {
  Bounds::from_min_max(DVec3::ZERO, DVec3::splat(extent))
}

/// Full subdivision at increasing resolutions.
fn bench_full_tree(c: &mut Criterion) {
  let mut group = c.benchmark_group("full_tree");

  for extent in [8.0, 16.0, 32.0] {
    let obstacles = scattered_obstacles(extent, 32, 1);
    group.bench_with_input(
      BenchmarkId::new("SpatialIndex::build", format!("{extent}³")),
      &extent,
      |b, &extent| {
        b.iter(|| {
          SpatialIndex::build(world(extent), black_box(&obstacles), &IndexConfig::FULL)
        })
      },
    );
  }

  group.finish();
}

/// Adaptive subdivision with a growing obstacle count.
fn bench_adaptive_tree(c: &mut Criterion) {
  let mut group = c.benchmark_group("adaptive_tree");

  for count in [16, 128, 512] {
    let obstacles = scattered_obstacles(128.0, count, 2);
    group.bench_with_input(
      BenchmarkId::new("SpatialIndex::build", count),
      &count,
      |b, _| {
        b.iter(|| {
          SpatialIndex::build(world(128.0), black_box(&obstacles), &IndexConfig::DEFAULT)
        })
      },
    );
  }

  group.finish();
}

/// Graph passes over a prebuilt tree.
fn bench_graph(c: &mut Criterion) {
  let obstacles = scattered_obstacles(32.0, 64, 3);
  let index = match SpatialIndex::build(world(32.0), &obstacles, &IndexConfig::FULL) {
    Ok(index) => index,
    Err(error) => panic!("bench world failed to build: {error}"),
  };

  c.bench_function("NavGraphBuilder::build (32³ full)", |b| {
    b.iter(|| NavGraphBuilder::new(&IndexConfig::FULL).build(black_box(&index)))
  });

  c.bench_function("NavSnapshot::build (32³ full)", |b| {
    b.iter(|| {
      NavSnapshot::build(
        BuildRequest::new(world(32.0), black_box(obstacles.clone())),
        &IndexConfig::FULL,
        None,
      )
    })
  });
}

criterion_group!(benches, bench_full_tree, bench_adaptive_tree, bench_graph);
criterion_main!(benches);
