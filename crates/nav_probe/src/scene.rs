//! Scene file parsing.
//!
//! A scene describes one world (bounds, obstacles, engine settings) and a list
//! of path queries to run against it.

use anyhow::{Context, Result};
use glam::DVec3;
use serde::Deserialize;
use std::path::Path;
use voxel_nav::{
	Bounds, IndexConfig, NavConfig, ObstacleVolume, OwnerKey, SearchConfig, SubdivisionMode,
	TeamId, TrafficConfig,
};

/// Root scene description.
#[derive(Debug, Deserialize)]
pub struct Scene {
	/// World volume. Omitting it exercises the missing-bounds error.
	pub world: Option<BoxConfig>,
	/// Obstacle boxes.
	#[serde(default)]
	pub obstacles: Vec<BoxConfig>,
	/// Tree settings.
	#[serde(default)]
	pub index: IndexSection,
	/// Search limits.
	#[serde(default)]
	pub search: SearchSection,
	/// Traffic shaping.
	#[serde(default)]
	pub traffic: TrafficSection,
	/// Queries, run in order.
	#[serde(default)]
	pub queries: Vec<QueryConfig>,
}

/// Axis-aligned box given by corners.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct BoxConfig {
	pub min: [f64; 3],
	pub max: [f64; 3],
}

/// Subdivision mode as written in the scene.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModeSetting {
	Full,
	#[default]
	Adaptive,
}

/// `[index]` table.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct IndexSection {
	pub min_leaf_size: f64,
	pub mode: ModeSetting,
	pub max_leaves: usize,
	pub occupancy_skin: f64,
}

/// `[search]` table.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SearchSection {
	/// 0 = unlimited.
	pub max_expansions: usize,
}

/// `[traffic]` table.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TrafficSection {
	pub reserved_prefix: usize,
	pub reservation_seconds: f64,
	pub penalty_magnitude: f64,
	pub tie_break_amplitude: f64,
	pub penalize_same_team_only: bool,
}

/// One `[[queries]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryConfig {
	pub start: [f64; 3],
	pub end: [f64; 3],
	/// Agent team; with `owner`, makes this a traffic-aware query.
	pub team: Option<u32>,
	/// Agent owner key.
	pub owner: Option<u64>,
	/// Simulation time to set before the query.
	pub time: Option<f64>,
}

impl Default for IndexSection {
	fn default() -> Self {
		let preset = IndexConfig::DEFAULT;
		Self {
			min_leaf_size: preset.min_leaf_size,
			mode: ModeSetting::Adaptive,
			max_leaves: preset.max_leaves,
			occupancy_skin: preset.occupancy_skin,
		}
	}
}

impl Default for SearchSection {
	fn default() -> Self {
		Self {
			max_expansions: SearchConfig::DEFAULT.max_expansions,
		}
	}
}

impl Default for TrafficSection {
	fn default() -> Self {
		let preset = TrafficConfig::DEFAULT;
		Self {
			reserved_prefix: preset.reserved_prefix,
			reservation_seconds: preset.reservation_seconds,
			penalty_magnitude: preset.penalty_magnitude,
			tie_break_amplitude: preset.tie_break_amplitude,
			penalize_same_team_only: preset.penalize_same_team_only,
		}
	}
}

impl BoxConfig {
	pub fn bounds(&self) -> Bounds {
		Bounds::from_min_max(DVec3::from_array(self.min), DVec3::from_array(self.max))
	}
}

impl QueryConfig {
	pub fn start(&self) -> DVec3 {
		DVec3::from_array(self.start)
	}

	pub fn end(&self) -> DVec3 {
		DVec3::from_array(self.end)
	}

	/// Team and owner when both are given.
	pub fn agent(&self) -> Option<(TeamId, OwnerKey)> {
		Some((TeamId(self.team?), OwnerKey(self.owner?)))
	}
}

impl Scene {
	/// Load a scene from a TOML file.
	pub fn load(path: &Path) -> Result<Self> {
		let content = std::fs::read_to_string(path)
			.with_context(|| format!("Failed to read scene file: {}", path.display()))?;
		Self::parse(&content)
	}

	/// Parse scene TOML.
	pub fn parse(content: &str) -> Result<Self> {
		let scene: Scene = toml::from_str(content).with_context(|| "Failed to parse scene TOML")?;

		for (i, obstacle) in scene.obstacles.iter().enumerate() {
			if (0..3).any(|k| obstacle.min[k] > obstacle.max[k]) {
				anyhow::bail!("Obstacle {i} has min above max: {:?} > {:?}", obstacle.min, obstacle.max);
			}
		}
		for (i, query) in scene.queries.iter().enumerate() {
			if query.team.is_some() != query.owner.is_some() {
				anyhow::bail!("Query {i} must set both team and owner, or neither");
			}
		}

		Ok(scene)
	}

	/// Engine configuration described by the scene.
	pub fn nav_config(&self) -> NavConfig {
		let mode = match self.index.mode {
			ModeSetting::Full => SubdivisionMode::Full,
			ModeSetting::Adaptive => SubdivisionMode::Adaptive,
		};
		NavConfig {
			index: IndexConfig {
				min_leaf_size: self.index.min_leaf_size,
				mode,
				max_leaves: self.index.max_leaves,
				occupancy_skin: self.index.occupancy_skin,
			},
			search: SearchConfig {
				max_expansions: self.search.max_expansions,
			},
			traffic: TrafficConfig {
				reserved_prefix: self.traffic.reserved_prefix,
				reservation_seconds: self.traffic.reservation_seconds,
				penalty_magnitude: self.traffic.penalty_magnitude,
				tie_break_amplitude: self.traffic.tie_break_amplitude,
				penalize_same_team_only: self.traffic.penalize_same_team_only,
			},
			require_occupancy_test: false,
		}
	}

	/// Obstacle volumes for the build request.
	pub fn obstacle_volumes(&self) -> Vec<ObstacleVolume> {
		self.obstacles
			.iter()
			.map(|obstacle| ObstacleVolume::new(obstacle.bounds()))
			.collect()
	}
}
