//! Octree spatial index over the world volume.
//!
//! The tree is explicit: every cell owns its children. It is built once per
//! rebuild and read-only afterwards.
//!
//! ```text
//! Child octant bits: bit 0 = +X, bit 1 = +Y, bit 2 = +Z
//! child.half_extents = parent.half_extents / 2
//! child.center       = parent.center ± child.half_extents (per axis)
//! ```
//!
//! # Module Structure
//!
//! - [`bounds`]: `Bounds` - center/half-extent box math
//! - [`node`]: `SpatialNode` - one cell, leaf or internal
//! - [`obstacle`]: `ObstacleVolume` - build-time obstacle box
//! - [`occupancy`]: `OccupancyTest` - injected exact occupancy check
//! - [`index`]: `SpatialIndex` - full/adaptive construction and point lookup

pub mod bounds;
pub mod index;
pub mod node;
pub mod obstacle;
pub mod occupancy;

// Re-exports
pub use bounds::Bounds;
pub use index::{IndexStats, SpatialIndex};
pub use node::SpatialNode;
pub use obstacle::ObstacleVolume;
pub use occupancy::{AlwaysOccupied, BoxOccupancy, OccupancyTest};
