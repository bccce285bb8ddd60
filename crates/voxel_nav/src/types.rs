//! Identifier newtypes shared across the engine.
//!
//! All ids are plain integers wrapped for type safety. Leaf and graph node ids
//! are assigned monotonically within one build; team and owner ids come from
//! the simulation.

/// Identifier of an octree cell (leaf or internal), unique within one build.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct LeafId(pub u32);

/// Identifier of a navigation graph node, dense in `0..node_count`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct NavNodeId(pub u32);

/// Index of an obstacle in the build's obstacle list.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ObstacleId(pub u32);

/// Team of a requesting agent.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct TeamId(pub u32);

/// Stable per-agent key used for reservation ownership and tie-break noise.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct OwnerKey(pub u64);

impl LeafId {
  /// Raw value.
  #[inline]
  pub fn raw(self) -> u32 {
    self.0
  }
}

impl NavNodeId {
  /// Raw value.
  #[inline]
  pub fn raw(self) -> u32 {
    self.0
  }

  /// Index into dense per-node tables.
  #[inline]
  pub fn index(self) -> usize {
    self.0 as usize
  }
}

impl ObstacleId {
  /// Index into the obstacle list.
  #[inline]
  pub fn index(self) -> usize {
    self.0 as usize
  }
}
