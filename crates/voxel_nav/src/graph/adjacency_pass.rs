//! Adjacency-hash pass: catches contacts the face pass misses.
//!
//! Leaf centers are bucketed into a uniform grid with cell size
//! `1.25 * min_leaf_size`. Each leaf scans the 27 grid cells around its own
//! center and connects to any leaf whose bounds are within `epsilon` on all
//! three axes. Only pairs with `j > i` are emitted.
//!
//! Large leaves have centers far from their small neighbors, so this pass
//! mostly adds edge and corner contacts between similar-sized leaves; the face
//! pass covers mixed sizes.

use std::collections::HashMap;

use glam::{DVec3, I64Vec3};
use rayon::prelude::*;
use smallvec::SmallVec;

use crate::octree::Bounds;

#[inline]
fn grid_key(point: DVec3, cell: f64) -> I64Vec3 {
  (point / cell).floor().as_i64vec3()
}

/// Candidate pairs `(i, j)`, `i < j`, grouped by `i` in ascending order.
pub(crate) fn adjacency_pass(bounds: &[Bounds], cell: f64, epsilon: f64) -> Vec<(u32, u32)> {
  let mut grid: HashMap<I64Vec3, SmallVec<[u32; 8]>> = HashMap::with_capacity(bounds.len());
  for (index, b) in bounds.iter().enumerate() {
    grid
      .entry(grid_key(b.center, cell))
      .or_default()
      .push(index as u32);
  }

  let per_leaf: Vec<Vec<(u32, u32)>> = bounds
    .par_iter()
    .enumerate()
    .map(|(index, a)| {
      let key = grid_key(a.center, cell);
      let mut found = Vec::new();
      for dz in -1..=1 {
        for dy in -1..=1 {
          for dx in -1..=1 {
            let Some(candidates) = grid.get(&(key + I64Vec3::new(dx, dy, dz))) else {
              continue;
            };
            for &other in candidates {
              if (other as usize) <= index {
                continue;
              }
              let gap = a.gap(&bounds[other as usize]);
              if gap.max_element() <= epsilon {
                found.push((index as u32, other));
              }
            }
          }
        }
      }
      // Grid cells are visited in a fixed order but candidates are not sorted
      found.sort_unstable();
      found
    })
    .collect();

  per_leaf.into_iter().flatten().collect()
}
