//! Generation-stamped scratch table for A*.
//!
//! One slot per graph node, reused across searches. A slot is valid only if
//! its stamp equals the current search id; anything else reads as
//! "unvisited" (`g = inf`, `h = 0`, `f = inf`, no parent). Starting a new
//! search therefore costs one increment, not a clear.
//!
//! Stamp `0` means "never touched". When the search id would wrap, every slot
//! is reset once and counting restarts at 1.

use crate::types::NavNodeId;

#[derive(Clone, Copy, Debug)]
struct Slot {
  g: f64,
  h: f64,
  f: f64,
  parent: Option<NavNodeId>,
  stamp: u32,
  closed_stamp: u32,
}

impl Slot {
  const NEVER: Self = Self {
    g: f64::INFINITY,
    h: 0.0,
    f: f64::INFINITY,
    parent: None,
    stamp: 0,
    closed_stamp: 0,
  };
}

/// Per-node search state, indexed by `NavNodeId`.
#[derive(Clone, Debug, Default)]
pub struct ScratchTable {
  slots: Vec<Slot>,
  search_id: u32,
}

impl ScratchTable {
  /// Empty table.
  pub fn new() -> Self {
    Self::default()
  }

  /// Start a new search over `node_count` nodes and return its id.
  pub fn begin(&mut self, node_count: usize) -> u32 {
    if self.slots.len() < node_count {
      self.slots.resize(node_count, Slot::NEVER);
    }
    if self.search_id == u32::MAX {
      self.slots.fill(Slot::NEVER);
      self.search_id = 0;
    }
    self.search_id += 1;
    self.search_id
  }

  /// Id of the current search (0 before the first one).
  #[inline]
  pub fn search_id(&self) -> u32 {
    self.search_id
  }

  /// Slot count (grows to the largest graph searched).
  #[inline]
  pub fn capacity(&self) -> usize {
    self.slots.len()
  }

  #[inline]
  fn live(&self, id: NavNodeId) -> Option<&Slot> {
    self
      .slots
      .get(id.index())
      .filter(|slot| slot.stamp == self.search_id && self.search_id != 0)
  }

  /// Node was touched in the current search.
  #[inline]
  pub fn is_visited(&self, id: NavNodeId) -> bool {
    self.live(id).is_some()
  }

  /// Cost from the start.
  #[inline]
  pub fn g(&self, id: NavNodeId) -> f64 {
    self.live(id).map_or(f64::INFINITY, |slot| slot.g)
  }

  /// Heuristic to the goal.
  #[inline]
  pub fn h(&self, id: NavNodeId) -> f64 {
    self.live(id).map_or(0.0, |slot| slot.h)
  }

  /// `g + h`.
  #[inline]
  pub fn f(&self, id: NavNodeId) -> f64 {
    self.live(id).map_or(f64::INFINITY, |slot| slot.f)
  }

  /// Predecessor on the best known path.
  #[inline]
  pub fn parent(&self, id: NavNodeId) -> Option<NavNodeId> {
    self.live(id).and_then(|slot| slot.parent)
  }

  /// Record a (better) path to `id`.
  #[inline]
  pub fn update(&mut self, id: NavNodeId, g: f64, h: f64, parent: Option<NavNodeId>) {
    let search_id = self.search_id;
    if let Some(slot) = self.slots.get_mut(id.index()) {
      if slot.stamp != search_id {
        slot.closed_stamp = 0;
      }
      slot.g = g;
      slot.h = h;
      slot.f = g + h;
      slot.parent = parent;
      slot.stamp = search_id;
    }
  }

  /// Mark `id` expanded in the current search.
  #[inline]
  pub fn close(&mut self, id: NavNodeId) {
    let search_id = self.search_id;
    if let Some(slot) = self.slots.get_mut(id.index()) {
      slot.closed_stamp = search_id;
    }
  }

  /// Node was expanded in the current search.
  #[inline]
  pub fn is_closed(&self, id: NavNodeId) -> bool {
    self.search_id != 0
      && self
        .slots
        .get(id.index())
        .is_some_and(|slot| slot.closed_stamp == self.search_id)
  }

  #[cfg(test)]
  pub(crate) fn force_search_id(&mut self, search_id: u32) {
    self.search_id = search_id;
  }
}
