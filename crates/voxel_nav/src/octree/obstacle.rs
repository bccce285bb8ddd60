//! ObstacleVolume - immutable box used only while building the tree.

use super::Bounds;

/// Obstacle bounding volume supplied by the collision collaborator.
///
/// Carries no identity beyond its geometry. The tree refers to obstacles by
/// their position in the build's obstacle list.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObstacleVolume {
  bounds: Bounds,
}

impl ObstacleVolume {
  /// Wrap a bounding box.
  pub fn new(bounds: Bounds) -> Self {
    Self { bounds }
  }

  /// The obstacle's bounds.
  #[inline]
  pub fn bounds(&self) -> &Bounds {
    &self.bounds
  }

  /// Check if the obstacle overlaps a cell with positive volume.
  #[inline]
  pub fn intersects(&self, cell: &Bounds) -> bool {
    self.bounds.intersects(cell)
  }
}

impl From<Bounds> for ObstacleVolume {
  fn from(bounds: Bounds) -> Self {
    Self::new(bounds)
  }
}
