//! Exact occupancy capability supplied by the collision collaborator.

use super::Bounds;

/// Narrow-phase "is this region actually blocked" test.
///
/// Consulted only for leaves that already hold obstacle references. The
/// engine passes the leaf bounds shrunk by the configured skin, so touching
/// geometry on a cell boundary does not block the cell.
///
/// Implemented for any `Fn(&Bounds) -> bool + Send + Sync` closure.
pub trait OccupancyTest: Send + Sync {
  /// Return true if any solid geometry overlaps `region`.
  fn is_occupied(&self, region: &Bounds) -> bool;
}

impl<F> OccupancyTest for F
where
  F: Fn(&Bounds) -> bool + Send + Sync,
{
  #[inline]
  fn is_occupied(&self, region: &Bounds) -> bool {
    self(region)
  }
}

/// Final blocked state of a broad-phase-blocked cell.
///
/// With a test, the cell shrunk by `skin` must be reported occupied; without
/// one, the broad-phase hit stands.
#[inline]
pub fn confirm_blocked(cell: &Bounds, skin: f64, test: Option<&dyn OccupancyTest>) -> bool {
  match test {
    Some(test) => test.is_occupied(&cell.shrunk(skin)),
    None => true,
  }
}

/// Occupancy test that treats every region as blocked.
///
/// Equivalent to broad-phase-only validation.
#[derive(Clone, Copy, Debug, Default)]
pub struct AlwaysOccupied;

impl OccupancyTest for AlwaysOccupied {
  fn is_occupied(&self, _region: &Bounds) -> bool {
    true
  }
}

/// Occupancy test backed by a list of boxes (e.g. exact collider AABBs).
#[derive(Clone, Debug, Default)]
pub struct BoxOccupancy {
  boxes: Vec<Bounds>,
}

impl BoxOccupancy {
  /// Create from exact solid boxes.
  pub fn new(boxes: Vec<Bounds>) -> Self {
    Self { boxes }
  }
}

impl OccupancyTest for BoxOccupancy {
  fn is_occupied(&self, region: &Bounds) -> bool {
    self.boxes.iter().any(|b| b.intersects(region))
  }
}
