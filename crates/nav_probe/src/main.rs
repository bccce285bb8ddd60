//! Navigation scene runner.
//!
//! Builds a navigation engine from a scene file and runs its queries,
//! printing build statistics and one line per query.

mod scene;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use voxel_nav::{BuildRequest, NavService, PathResult};
use web_time::Instant;

use scene::{QueryConfig, Scene};

/// Scene runner for the voxel_nav navigation engine.
#[derive(Parser, Debug)]
#[command(name = "nav_probe")]
#[command(about = "Builds a navigation scene and runs its path queries")]
struct Args {
	/// Path to scene TOML file.
	#[arg(short, long)]
	scene: PathBuf,

	/// Run the query list this many times (timings are averaged).
	#[arg(short, long, default_value_t = 1)]
	repeat: usize,

	/// Additional random point-to-point queries.
	#[arg(long, default_value_t = 0)]
	random: usize,

	/// Seed for random queries.
	#[arg(long, default_value_t = 0)]
	seed: u64,

	/// Print every waypoint.
	#[arg(short, long)]
	verbose: bool,
}

fn main() -> Result<()> {
	let args = Args::parse();

	println!("Loading scene from: {}", args.scene.display());
	let scene = Scene::load(&args.scene)?;
	let config = scene.nav_config();

	let mut service = NavService::new(config, None).context("Invalid scene configuration")?;
	let request = BuildRequest {
		world: scene.world.map(|world| world.bounds()),
		obstacles: scene.obstacle_volumes(),
	};
	service
		.build(request)
		.with_context(|| format!("Failed to build scene {}", args.scene.display()))?;

	let snapshot = service
		.snapshot()
		.context("Engine reported success but holds no snapshot")?;
	let index_stats = snapshot.index().stats();
	let graph_stats = snapshot.graph().stats();
	println!(
		"Built in {} us: {} cells, {} leaves ({} broad-phase blocked, {} internal records)",
		snapshot.build_us(),
		index_stats.cells,
		index_stats.leaves,
		index_stats.broad_phase_blocked,
		index_stats.internal_records
	);
	println!(
		"Graph: {} nodes, {} edges ({} face, {} adjacency), epsilon {}",
		graph_stats.navigable,
		snapshot.graph().edge_count(),
		graph_stats.face_edges,
		graph_stats.adjacency_edges,
		snapshot.graph().epsilon()
	);

	let mut queries = scene.queries.clone();
	let mut rng = StdRng::seed_from_u64(args.seed);
	for _ in 0..args.random {
		let (Some(start), Some(end)) = (
			service.random_navigable_position(&mut rng),
			service.random_navigable_position(&mut rng),
		) else {
			break;
		};
		queries.push(QueryConfig {
			start: start.to_array(),
			end: end.to_array(),
			team: None,
			owner: None,
			time: None,
		});
	}

	if queries.is_empty() {
		println!("No queries");
		return Ok(());
	}

	println!("\nRunning {} queries x {}", queries.len(), args.repeat.max(1));
	let mut total_us = 0u128;
	for round in 0..args.repeat.max(1) {
		service.clear_reservations();
		let round_start = Instant::now();
		for (i, query) in queries.iter().enumerate() {
			if let Some(time) = query.time {
				service.set_time(time);
			}
			let result = match query.agent() {
				Some((team, owner)) => service.find_path_for_agent(query.start(), query.end(), team, owner),
				None => service.find_path(query.start(), query.end()),
			};
			if round > 0 {
				continue;
			}
			match result {
				Ok(path) => print_path(i, query, &path, service.reservations().len(), args.verbose),
				Err(error) => println!("  [{i}] error: {error}"),
			}
		}
		total_us += round_start.elapsed().as_micros();
	}

	let per_round = total_us as f64 / args.repeat.max(1) as f64;
	println!(
		"\n{:.1} us per round, {:.1} us per query",
		per_round,
		per_round / queries.len() as f64
	);

	Ok(())
}

fn print_path(index: usize, query: &QueryConfig, path: &PathResult, reservations: usize, verbose: bool) {
	let kind = match query.agent() {
		Some((team, owner)) => format!("agent team={} owner={}", team.0, owner.0),
		None => "plain".to_string(),
	};
	println!(
		"  [{index}] {kind}: {} leaves, {} waypoints, cost {:.3}, {} expansions, {:?}, {} reservations",
		path.leaves.len(),
		path.waypoints.len(),
		path.cost,
		path.expansions,
		path.termination,
		reservations
	);
	if verbose {
		for waypoint in &path.waypoints {
			println!("      ({:.3}, {:.3}, {:.3})", waypoint.x, waypoint.y, waypoint.z);
		}
	}
}
