//! Deterministic per-(owner, leaf) tie-break noise.
//!
//! Small enough not to change which route is cheaper in a meaningful way,
//! large enough that agents with different owner keys break equal-cost ties
//! differently and spread out.

use crate::types::{LeafId, OwnerKey};

/// 2^64 / golden ratio.
const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

/// splitmix64 output finalizer.
#[inline]
fn mix64(mut z: u64) -> u64 {
  z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
  z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
  z ^ (z >> 31)
}

/// Uniform value in `[0, 1)` for `(owner, leaf)`.
#[inline]
pub fn unit_noise(owner: OwnerKey, leaf: LeafId) -> f64 {
  let bits = mix64(owner.0 ^ (leaf.raw() as u64).wrapping_mul(GOLDEN_GAMMA));
  // Top 53 bits fill an f64 mantissa exactly
  (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
}

/// Noise in `[0, amplitude)`. Zero or negative amplitude gives zero.
#[inline]
pub fn tie_break_noise(owner: OwnerKey, leaf: LeafId, amplitude: f64) -> f64 {
  if amplitude > 0.0 {
    unit_noise(owner, leaf) * amplitude
  } else {
    0.0
  }
}
