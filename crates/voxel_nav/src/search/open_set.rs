//! Min-heap open set with lazy deletion.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::types::NavNodeId;

/// Heap entry. Popped in ascending `f`, then ascending node id.
#[derive(Clone, Copy, Debug)]
pub(crate) struct OpenEntry {
  pub(crate) f: f64,
  pub(crate) id: NavNodeId,
}

impl PartialEq for OpenEntry {
  fn eq(&self, other: &Self) -> bool {
    self.cmp(other) == Ordering::Equal
  }
}

impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl Ord for OpenEntry {
  // Reversed: BinaryHeap is a max-heap
  fn cmp(&self, other: &Self) -> Ordering {
    other
      .f
      .total_cmp(&self.f)
      .then_with(|| other.id.cmp(&self.id))
  }
}

/// Open set. Entries superseded by a cheaper push are skipped by the caller.
#[derive(Debug, Default)]
pub(crate) struct OpenSet {
  heap: BinaryHeap<OpenEntry>,
}

impl OpenSet {
  #[inline]
  pub(crate) fn clear(&mut self) {
    self.heap.clear();
  }

  #[inline]
  pub(crate) fn push(&mut self, f: f64, id: NavNodeId) {
    self.heap.push(OpenEntry { f, id });
  }

  #[inline]
  pub(crate) fn pop(&mut self) -> Option<OpenEntry> {
    self.heap.pop()
  }

  #[inline]
  pub(crate) fn len(&self) -> usize {
    self.heap.len()
  }
}
