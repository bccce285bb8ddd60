//! A* path search over the navigation graph.
//!
//! # Module Structure
//!
//! - [`astar`]: `PathSearch` - the search loop and path reconstruction
//! - [`scratch`]: `ScratchTable` - generation-stamped per-node state
//! - `open_set`: binary heap ordered by `f`, then node id

pub mod astar;
mod open_set;
pub mod scratch;

pub use astar::{PathSearch, SearchOutcome, Termination};
pub use scratch::ScratchTable;
