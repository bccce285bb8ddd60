//! voxel_nav - Volumetric navigation: octree, connectivity graph and A*
//!
//! This crate partitions a 3D world into an octree around obstacle boxes,
//! connects the navigable leaves into a graph, and answers path queries with
//! an A* search that reuses its scratch state across queries. A traffic layer
//! lets agents reserve the start of their route so later agents fan out.
//!
//! # Features
//!
//! - **Full or adaptive subdivision**: uniform grid, or refinement only
//!   around obstacles
//! - **Exact occupancy hook**: broad-phase hits can be confirmed by a
//!   caller-supplied [`OccupancyTest`]
//! - **Mixed-size adjacency**: face bucketing plus a center hash catch face,
//!   edge and corner contacts between leaves of any size
//! - **Best-so-far fallback**: unreachable goals and capped searches still
//!   return the most promising partial route
//! - **Snapshots**: builds are immutable and shared through `Arc`; background
//!   rebuilds swap them atomically
//!
//! # Example
//!
//! ```ignore
//! use voxel_nav::{Bounds, BuildRequest, NavConfig, NavService, ObstacleVolume};
//!
//! let mut nav = NavService::new(NavConfig::default(), None)?;
//! nav.build(BuildRequest::new(
//!     Bounds::from_min_max(DVec3::ZERO, DVec3::splat(64.0)),
//!     obstacles,
//! ))?;
//!
//! let path = nav.find_path(start, end)?;
//! for waypoint in &path.waypoints {
//!     // steer toward waypoint
//! }
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod types;

// Re-export commonly used items
pub use config::{IndexConfig, NavConfig, SearchConfig, SubdivisionMode, TrafficConfig};
pub use error::{BuildError, ConfigError, QueryError};
pub use types::{LeafId, NavNodeId, ObstacleId, OwnerKey, TeamId};

// Octree spatial index
pub mod octree;
pub use octree::{
  AlwaysOccupied, Bounds, BoxOccupancy, ObstacleVolume, OccupancyTest, SpatialIndex, SpatialNode,
};

// Navigation graph over navigable leaves
pub mod graph;
pub use graph::{LeafRecord, NavGraph, NavGraphBuilder, NavGraphNode};

// A* search
pub mod search;
pub use search::{PathSearch, SearchOutcome, Termination};

// Traffic reservations
pub mod traffic;
pub use traffic::{Reservation, ReservationTable};

// Build results and background rebuilds
pub mod rebuild;
pub mod snapshot;
pub use rebuild::AsyncRebuild;
pub use snapshot::{BuildRequest, NavSnapshot};

// Engine facade
pub mod service;
pub use service::{NavService, PathResult};

// Metrics (feature-gated)
pub mod metrics;
pub use metrics::NavMetrics;

// Test utilities
#[cfg(test)]
pub mod test_utils;
