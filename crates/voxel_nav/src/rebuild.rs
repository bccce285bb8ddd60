//! Async Rebuild
//!
//! Runs a full navigation build off the owning thread and hands the finished
//! snapshot back for an atomic swap.
//!
//! # Flow
//!
//! ```text
//! Owning Thread                     Async (rayon)
//! ┌────────────────┐
//! │ Capture inputs │
//! │ (world, obst.) │
//! └───────┬────────┘
//!         │ start()
//!         ▼
//!                                  ┌───────────────┐
//!                                  │ build tree    │
//!                                  │ build graph   │
//!                                  └───────┬───────┘
//!                                          │
//! ┌────────────────┐                       │
//! │ poll()         │◄──────────────────────┘
//! │ - swap Arc     │
//! │ - clear traffic│
//! └────────────────┘
//! ```
//!
//! Queries keep using the previous snapshot until the swap.

use std::sync::Arc;

use crossbeam_channel::{self as channel, Receiver, TryRecvError};

use crate::config::IndexConfig;
use crate::error::BuildError;
use crate::octree::OccupancyTest;
use crate::snapshot::{BuildRequest, NavSnapshot};

/// Everything a background build needs, owned.
pub struct RebuildRequest {
	/// World and obstacles.
	pub build: BuildRequest,
	/// Tree parameters.
	pub config: IndexConfig,
	/// Exact occupancy test, shared with the owner.
	pub occupancy: Option<Arc<dyn OccupancyTest>>,
}

/// Outcome delivered by [`AsyncRebuild::poll`].
pub type RebuildResult = Result<NavSnapshot, BuildError>;

/// Non-blocking background build.
///
/// At most one build runs at a time.
pub struct AsyncRebuild {
	receiver: Option<Receiver<RebuildResult>>,
}

impl AsyncRebuild {
	/// Idle rebuild slot.
	pub fn new() -> Self {
		Self { receiver: None }
	}

	/// Check if a build is running.
	pub fn is_busy(&self) -> bool {
		self.receiver.is_some()
	}

	/// Start a background build.
	///
	/// Returns `true` if started, `false` if already busy.
	pub fn start(&mut self, request: RebuildRequest) -> bool {
		if self.is_busy() {
			return false;
		}

		let (sender, receiver) = channel::bounded(1);
		self.receiver = Some(receiver);

		rayon::spawn(move || {
			let RebuildRequest {
				build,
				config,
				occupancy,
			} = request;
			let result = NavSnapshot::build(build, &config, occupancy.as_deref());
			// Receiver dropped = cancelled
			let _ = sender.send(result);
		});

		true
	}

	/// Poll for the result (non-blocking).
	///
	/// Returns `Some(result)` when complete, `None` if still running or idle.
	pub fn poll(&mut self) -> Option<RebuildResult> {
		let receiver = self.receiver.as_ref()?;

		match receiver.try_recv() {
			Ok(result) => {
				self.receiver = None;
				Some(result)
			}
			Err(TryRecvError::Empty) => None,
			Err(TryRecvError::Disconnected) => {
				self.receiver = None;
				None
			}
		}
	}

	/// Block until the running build finishes.
	///
	/// Returns `None` when idle.
	pub fn wait(&mut self) -> Option<RebuildResult> {
		let receiver = self.receiver.take()?;
		receiver.recv().ok()
	}

	/// Drop the pending build; its result is discarded.
	pub fn cancel(&mut self) {
		self.receiver = None;
	}
}

impl Default for AsyncRebuild {
	fn default() -> Self {
		Self::new()
	}
}

impl std::fmt::Debug for AsyncRebuild {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("AsyncRebuild")
			.field("busy", &self.is_busy())
			.finish()
	}
}
