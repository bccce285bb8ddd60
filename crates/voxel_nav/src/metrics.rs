//! Navigation metrics: build and query timings, fallback counters.
//!
//! Feature-gated and runtime-toggled; without the `metrics` feature every
//! `record_*` call is a no-op.
//!
//! # Usage
//!
//! ```ignore
//! use voxel_nav::metrics::COLLECT_METRICS;
//!
//! // Compile with --features metrics
//! COLLECT_METRICS.store(false, Ordering::Relaxed);
//!
//! let metrics = service.metrics();
//! println!("avg search: {:.1} us", metrics.avg_search_us());
//! ```

use std::collections::VecDeque;
use std::sync::atomic::AtomicBool;
#[cfg(feature = "metrics")]
use std::sync::atomic::Ordering;

use crate::search::Termination;

/// Runtime toggle for metrics collection.
pub static COLLECT_METRICS: AtomicBool = AtomicBool::new(true);

/// Check if metrics collection is enabled (both compile-time and runtime).
#[inline]
pub fn is_enabled() -> bool {
    #[cfg(feature = "metrics")]
    {
        COLLECT_METRICS.load(Ordering::Relaxed)
    }
    #[cfg(not(feature = "metrics"))]
    {
        false
    }
}

/// Fixed-capacity window of recent values.
#[derive(Debug, Clone)]
pub struct RollingWindow<T> {
    buffer: VecDeque<T>,
    capacity: usize,
}

impl<T> RollingWindow<T> {
    /// Create a window holding at most `capacity` values.
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a new value, evicting the oldest if at capacity.
    pub fn push(&mut self, value: T) {
        if self.capacity == 0 {
            return;
        }
        if self.buffer.len() >= self.capacity {
            self.buffer.pop_front();
        }
        self.buffer.push_back(value);
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.buffer.iter()
    }

    /// Most recent value.
    pub fn last(&self) -> Option<&T> {
        self.buffer.back()
    }
}

impl RollingWindow<u64> {
    pub fn sum(&self) -> u64 {
        self.buffer.iter().sum()
    }

    /// Mean of the window, 0 when empty.
    pub fn average(&self) -> f64 {
        if self.buffer.is_empty() {
            0.0
        } else {
            self.sum() as f64 / self.buffer.len() as f64
        }
    }

    pub fn min_max(&self) -> Option<(u64, u64)> {
        let min = self.buffer.iter().min()?;
        let max = self.buffer.iter().max()?;
        Some((*min, *max))
    }
}

impl Default for RollingWindow<u64> {
    fn default() -> Self {
        Self::new(128)
    }
}

/// Engine-level statistics.
#[derive(Debug, Clone, Default)]
pub struct NavMetrics {
    // Builds
    /// Build wall times in microseconds (tree + graph).
    pub build_timings: RollingWindow<u64>,
    /// Successful builds.
    pub builds: u64,
    /// Rejected builds.
    pub failed_builds: u64,
    /// Leaves in the current graph.
    pub leaves: usize,
    /// Navigable nodes in the current graph.
    pub nodes: usize,
    /// Edges in the current graph.
    pub edges: usize,

    // Queries
    /// Search wall times in microseconds.
    pub search_timings: RollingWindow<u64>,
    /// Expansions per search.
    pub expansions: RollingWindow<u64>,
    /// Searches run.
    pub searches: u64,
    /// Searches that ran the open set dry.
    pub exhausted: u64,
    /// Searches stopped by the expansion cap.
    pub capped: u64,

    // Traffic
    /// Leaf reservations written.
    pub reservations_written: u64,
    /// Expired reservations swept.
    pub reservations_swept: u64,
}

impl NavMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset windows and counters.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Record a completed build.
    pub fn record_build(&mut self, timing_us: u64, leaves: usize, nodes: usize, edges: usize) {
        if !is_enabled() {
            return;
        }
        self.build_timings.push(timing_us);
        self.builds += 1;
        self.leaves = leaves;
        self.nodes = nodes;
        self.edges = edges;
    }

    /// Record a rejected build.
    pub fn record_failed_build(&mut self) {
        if is_enabled() {
            self.failed_builds += 1;
        }
    }

    /// Record one search.
    pub fn record_search(&mut self, timing_us: u64, expansions: usize, termination: Termination) {
        if !is_enabled() {
            return;
        }
        self.search_timings.push(timing_us);
        self.expansions.push(expansions as u64);
        self.searches += 1;
        match termination {
            Termination::ReachedGoal => {}
            Termination::Exhausted => self.exhausted += 1,
            Termination::IterationCap => self.capped += 1,
        }
    }

    /// Record reservation writes and sweeps.
    pub fn record_reservations(&mut self, written: usize, swept: usize) {
        if is_enabled() {
            self.reservations_written += written as u64;
            self.reservations_swept += swept as u64;
        }
    }

    pub fn avg_search_us(&self) -> f64 {
        self.search_timings.average()
    }

    pub fn avg_build_us(&self) -> f64 {
        self.build_timings.average()
    }

    pub fn avg_expansions(&self) -> f64 {
        self.expansions.average()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rolling_window() {
        let mut window = RollingWindow::new(3);
        assert!(window.is_empty());

        window.push(10u64);
        window.push(20);
        window.push(30);
        assert_eq!(window.sum(), 60);
        assert_eq!(window.average(), 20.0);

        // Oldest is evicted
        window.push(40);
        assert_eq!(window.len(), 3);
        assert_eq!(window.sum(), 90);
        assert_eq!(window.min_max(), Some((20, 40)));
        assert_eq!(window.last(), Some(&40));
    }

    #[test]
    fn test_empty_window() {
        let window = RollingWindow::<u64>::default();
        assert_eq!(window.average(), 0.0);
        assert_eq!(window.min_max(), None);
    }

    #[cfg(feature = "metrics")]
    #[test]
    fn test_search_recording() {
        let mut metrics = NavMetrics::new();
        metrics.record_search(100, 10, Termination::ReachedGoal);
        metrics.record_search(300, 30, Termination::IterationCap);
        metrics.record_search(200, 20, Termination::Exhausted);

        assert_eq!(metrics.searches, 3);
        assert_eq!(metrics.capped, 1);
        assert_eq!(metrics.exhausted, 1);
        assert_eq!(metrics.avg_search_us(), 200.0);
        assert_eq!(metrics.avg_expansions(), 20.0);
    }

    #[cfg(not(feature = "metrics"))]
    #[test]
    fn test_recording_is_noop_without_feature() {
        let mut metrics = NavMetrics::new();
        metrics.record_search(100, 10, Termination::ReachedGoal);
        metrics.record_build(5, 1, 1, 0);
        assert_eq!(metrics.searches, 0);
        assert_eq!(metrics.builds, 0);
    }
}
