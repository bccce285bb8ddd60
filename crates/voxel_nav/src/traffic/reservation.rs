//! ReservationTable - short-lived claims on leaves by agents.
//!
//! # Rules
//!
//! ```text
//! reserve:  new or expired -> { team, owner, now + seconds, strength 1 }
//!           live           -> expiry = max(old, new), strength + 1 (cap 8),
//!                             owner and team unchanged
//!
//! penalty:  none / expired           -> noise
//!           same owner               -> noise
//!           same-team-only, other team -> noise
//!           otherwise                -> max(0, magnitude) * strength + noise
//! ```
//!
//! Expired entries linger until [`ReservationTable::sweep_expired`] runs;
//! every rule treats them as absent.

use std::collections::HashMap;

use super::noise::tie_break_noise;
use crate::config::TrafficConfig;
use crate::constants::MAX_RESERVATION_STRENGTH;
use crate::types::{LeafId, OwnerKey, TeamId};

/// One claim on a leaf.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Reservation {
  /// Team of the first claimant.
  pub team: TeamId,
  /// First claimant.
  pub owner: OwnerKey,
  /// Time (seconds) after which the claim is void.
  pub expiry: f64,
  /// Number of overlapping claims, `1..=8`.
  pub strength: u8,
}

impl Reservation {
  /// Claim is still in force at `now`.
  #[inline]
  pub fn is_live(&self, now: f64) -> bool {
    now < self.expiry
  }
}

/// Leaf reservations keyed by `LeafId`.
#[derive(Clone, Debug, Default)]
pub struct ReservationTable {
  entries: HashMap<LeafId, Reservation>,
}

impl ReservationTable {
  /// Empty table.
  pub fn new() -> Self {
    Self::default()
  }

  /// Entries, including expired ones not yet swept.
  #[inline]
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  /// No entries at all.
  #[inline]
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Reservation on `leaf`, live or not.
  #[inline]
  pub fn get(&self, leaf: LeafId) -> Option<&Reservation> {
    self.entries.get(&leaf)
  }

  /// Live reservation on `leaf`.
  #[inline]
  pub fn live(&self, leaf: LeafId, now: f64) -> Option<&Reservation> {
    self.entries.get(&leaf).filter(|r| r.is_live(now))
  }

  /// Drop everything.
  pub fn clear(&mut self) {
    self.entries.clear();
  }

  /// Drop entries that expired at or before `now`. Returns how many.
  pub fn sweep_expired(&mut self, now: f64) -> usize {
    let before = self.entries.len();
    self.entries.retain(|_, r| r.is_live(now));
    let removed = before - self.entries.len();
    if removed > 0 {
      tracing::debug!(removed, remaining = self.entries.len(), "swept expired reservations");
    }
    removed
  }

  /// Reserve the first `config.reserved_prefix` leaves of a path.
  ///
  /// Returns the number of leaves written.
  pub fn reserve_prefix(
    &mut self,
    leaves: &[LeafId],
    team: TeamId,
    owner: OwnerKey,
    now: f64,
    config: &TrafficConfig,
  ) -> usize {
    let count = config.reserved_prefix.min(leaves.len());
    let expiry = now + config.reservation_seconds;
    for &leaf in &leaves[..count] {
      self
        .entries
        .entry(leaf)
        .and_modify(|r| {
          if r.is_live(now) {
            r.expiry = r.expiry.max(expiry);
            r.strength = (r.strength + 1).min(MAX_RESERVATION_STRENGTH);
          } else {
            *r = Reservation {
              team,
              owner,
              expiry,
              strength: 1,
            };
          }
        })
        .or_insert(Reservation {
          team,
          owner,
          expiry,
          strength: 1,
        });
    }
    count
  }

  /// Extra cost for `owner` of `team` entering `leaf` at `now`.
  pub fn entry_penalty(
    &self,
    leaf: LeafId,
    team: TeamId,
    owner: OwnerKey,
    now: f64,
    config: &TrafficConfig,
  ) -> f64 {
    let noise = tie_break_noise(owner, leaf, config.tie_break_amplitude);
    let Some(reservation) = self.live(leaf, now) else {
      return noise;
    };
    if reservation.owner == owner {
      return noise;
    }
    if config.penalize_same_team_only && reservation.team != team {
      return noise;
    }
    config.penalty_magnitude.max(0.0) * reservation.strength as f64 + noise
  }
}

#[cfg(test)]
#[path = "reservation_test.rs"]
mod reservation_test;
