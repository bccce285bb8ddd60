//! Face-neighbor pass: connects leaves whose faces touch.
//!
//! For each axis, every leaf's min face and max face are bucketed by the
//! quantized face coordinate (`round(v / step)`, `step = 2 * epsilon`) and by
//! an in-plane tile. Tiles come in power-of-two size classes starting at the
//! smallest face; a face is filed under the class that fits its larger
//! in-plane extent, in every tile of that class it covers.
//!
//! A leaf looks up the opposite faces in its own class and every coarser
//! class, over the tiles its face (grown by `epsilon`) covers. A pair of
//! different sizes is found from the smaller leaf, so no leaf scans the
//! whole plane.
//!
//! ```text
//!   +----+---------+
//!   | A  |         |   A.max.x == B.min.x  -> same plane key on X
//!   +----+    B    |   A looks up B's (coarser) tiles -> edge
//!   | C  |         |   C.max.x == B.min.x  -> edge as well
//!   +----+---------+
//! ```
//!
//! Candidates must agree on the face coordinate within `2 * epsilon` and
//! overlap on the other two axes with `epsilon` slack.

use std::collections::HashMap;

use rayon::prelude::*;
use smallvec::SmallVec;

use crate::octree::Bounds;

/// Deepest tile class; faces beyond it share the last class.
const MAX_TILE_CLASS: u32 = 62;

/// (plane key, tile class, tile u, tile v)
type FaceKey = (i64, u32, i64, i64);
type FaceBuckets = HashMap<FaceKey, SmallVec<[u32; 4]>>;

#[inline]
fn quantize(value: f64, step: f64) -> i64 {
  (value / step).round() as i64
}

/// The two in-plane axes of `axis`.
#[inline]
fn plane_axes(axis: usize) -> (usize, usize) {
  ((axis + 1) % 3, (axis + 2) % 3)
}

/// Check that two boxes overlap on both axes other than `axis`.
#[inline]
fn overlaps_across(a: &Bounds, b: &Bounds, axis: usize, epsilon: f64) -> bool {
  let (a_min, a_max) = (a.min(), a.max());
  let (b_min, b_max) = (b.min(), b.max());
  (0..3)
    .filter(|&k| k != axis)
    .all(|k| a_min[k] <= b_max[k] + epsilon && b_min[k] <= a_max[k] + epsilon)
}

/// Face lookup tables for one set of leaves.
pub(crate) struct FaceIndex<'a> {
  bounds: &'a [Bounds],
  epsilon: f64,
  step: f64,
  base_tile: f64,
  /// Tile classes in use, ascending.
  classes: Vec<u32>,
  /// [axis] -> min faces
  min_faces: [FaceBuckets; 3],
  /// [axis] -> max faces
  max_faces: [FaceBuckets; 3],
}

impl<'a> FaceIndex<'a> {
  pub(crate) fn new(bounds: &'a [Bounds], epsilon: f64) -> Self {
    let step = 2.0 * epsilon;
    let base_tile = bounds
      .iter()
      .map(|b| {
        let size = b.size();
        size.x.min(size.y).min(size.z)
      })
      .filter(|&s| s > 0.0 && s.is_finite())
      .fold(f64::INFINITY, f64::min);
    let base_tile = if base_tile.is_finite() { base_tile } else { 1.0 };

    let mut index = Self {
      bounds,
      epsilon,
      step,
      base_tile,
      classes: Vec::new(),
      min_faces: Default::default(),
      max_faces: Default::default(),
    };

    let mut classes = Vec::new();
    for (leaf, b) in bounds.iter().enumerate() {
      let (min, max) = (b.min(), b.max());
      for axis in 0..3 {
        let class = index.tile_class(b, axis);
        classes.push(class);
        let (u_range, v_range) = index.tile_range(b, axis, class, 0.0);
        let sides = [
          (&mut index.min_faces[axis], min[axis]),
          (&mut index.max_faces[axis], max[axis]),
        ];
        for (faces, coord) in sides {
          let plane = quantize(coord, step);
          for u in u_range.0..=u_range.1 {
            for v in v_range.0..=v_range.1 {
              faces.entry((plane, class, u, v)).or_default().push(leaf as u32);
            }
          }
        }
      }
    }
    classes.sort_unstable();
    classes.dedup();
    index.classes = classes;
    index
  }

  #[inline]
  fn tile_size(&self, class: u32) -> f64 {
    self.base_tile * (1u64 << class) as f64
  }

  /// Size class of the face of `b` normal to `axis`.
  fn tile_class(&self, b: &Bounds, axis: usize) -> u32 {
    let (u, v) = plane_axes(axis);
    let size = b.size();
    let extent = size[u].max(size[v]);
    let ratio = extent / self.base_tile;
    if ratio <= 1.0 {
      return 0;
    }
    (ratio.log2().ceil() as u32).min(MAX_TILE_CLASS)
  }

  /// Inclusive tile index ranges covered by the face of `b`, grown by `slack`.
  fn tile_range(
    &self,
    b: &Bounds,
    axis: usize,
    class: u32,
    slack: f64,
  ) -> ((i64, i64), (i64, i64)) {
    let (u, v) = plane_axes(axis);
    let tile = self.tile_size(class);
    let (min, max) = (b.min(), b.max());
    let span = |k: usize| {
      (
        ((min[k] - slack) / tile).floor() as i64,
        ((max[k] + slack) / tile).floor() as i64,
      )
    };
    (span(u), span(v))
  }

  /// Visit every leaf whose opposite face may touch a face of `leaf`.
  ///
  /// `visit` receives `(axis, positive, other)`; `positive` selects the +axis
  /// face of `leaf`. A leaf filed in several tiles may be visited more than
  /// once.
  pub(crate) fn for_each_candidate(&self, leaf: usize, mut visit: impl FnMut(usize, bool, u32)) {
    let a = &self.bounds[leaf];
    for axis in 0..3 {
      let own_class = self.tile_class(a, axis);
      for positive in [true, false] {
        let (face, opposite) = if positive {
          (a.max()[axis], &self.min_faces[axis])
        } else {
          (a.min()[axis], &self.max_faces[axis])
        };
        let key = quantize(face, self.step);
        for &class in self.classes.iter().filter(|&&c| c >= own_class) {
          let (u_range, v_range) = self.tile_range(a, axis, class, self.epsilon);
          for u in u_range.0..=u_range.1 {
            for v in v_range.0..=v_range.1 {
              // Neighboring keys absorb values that round across a bucket edge
              for plane in (key - 1)..=(key + 1) {
                let Some(candidates) = opposite.get(&(plane, class, u, v)) else {
                  continue;
                };
                for &other in candidates {
                  visit(axis, positive, other);
                }
              }
            }
          }
        }
      }
    }
  }

  /// Touching pairs `(leaf, other)` for one leaf, sorted and deduplicated.
  fn pairs_for(&self, leaf: usize) -> Vec<(u32, u32)> {
    let a = &self.bounds[leaf];
    let mut found = Vec::new();
    self.for_each_candidate(leaf, |axis, positive, other| {
      if other as usize == leaf {
        return;
      }
      let b = &self.bounds[other as usize];
      let (face, other_face) = if positive {
        (a.max()[axis], b.min()[axis])
      } else {
        (a.min()[axis], b.max()[axis])
      };
      if (other_face - face).abs() <= self.step && overlaps_across(a, b, axis, self.epsilon) {
        found.push((leaf as u32, other));
      }
    });
    found.sort_unstable();
    found.dedup();
    found
  }
}

/// Candidate pairs `(i, j)` where leaf `j` touches a face of leaf `i`.
///
/// Pairs come out grouped by `i` in ascending order; a contact may appear in
/// one or both orientations and is merged by the edge set.
pub(crate) fn face_pass(bounds: &[Bounds], epsilon: f64) -> Vec<(u32, u32)> {
  let index = FaceIndex::new(bounds, epsilon);
  let per_leaf: Vec<Vec<(u32, u32)>> = (0..bounds.len())
    .into_par_iter()
    .map(|leaf| index.pairs_for(leaf))
    .collect();

  per_leaf.into_iter().flatten().collect()
}

#[cfg(test)]
#[path = "face_pass_test.rs"]
mod face_pass_test;
