//! Axis-aligned box in center + half-extent form, double precision.

use glam::DVec3;

/// Double-precision axis-aligned box stored as center and half-extents.
///
/// Used for the world volume, octree cells and obstacle volumes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
	/// Box center.
	pub center: DVec3,
	/// Half of the box size on each axis.
	pub half_extents: DVec3,
}

impl Bounds {
	/// Create bounds from center and half-extents.
	pub fn new(center: DVec3, half_extents: DVec3) -> Self {
		Self {
			center,
			half_extents,
		}
	}

	/// Create bounds from min and max corners.
	///
	/// # Panics
	/// Debug-asserts that min <= max on all axes.
	pub fn from_min_max(min: DVec3, max: DVec3) -> Self {
		debug_assert!(
			min.x <= max.x && min.y <= max.y && min.z <= max.z,
			"Bounds min must be <= max on all axes"
		);
		Self {
			center: (min + max) * 0.5,
			half_extents: (max - min) * 0.5,
		}
	}

	/// Minimum corner.
	#[inline]
	pub fn min(&self) -> DVec3 {
		self.center - self.half_extents
	}

	/// Maximum corner.
	#[inline]
	pub fn max(&self) -> DVec3 {
		self.center + self.half_extents
	}

	/// Full size on each axis.
	#[inline]
	pub fn size(&self) -> DVec3 {
		self.half_extents * 2.0
	}

	/// Largest full extent over the three axes.
	#[inline]
	pub fn largest_extent(&self) -> f64 {
		self.size().max_element()
	}

	/// True when any extent is non-positive or any component is not finite.
	pub fn is_degenerate(&self) -> bool {
		!self.center.is_finite()
			|| !self.half_extents.is_finite()
			|| self.half_extents.min_element() <= 0.0
	}

	/// Bounds of child `octant` after splitting this box in half on every axis.
	///
	/// Octant bits: bit 0 = +X, bit 1 = +Y, bit 2 = +Z.
	#[inline]
	pub fn octant(&self, octant: u8) -> Self {
		let half = self.half_extents * 0.5;
		let sign = |bit: u8| if octant & bit != 0 { 1.0 } else { -1.0 };
		let offset = DVec3::new(half.x * sign(1), half.y * sign(2), half.z * sign(4));
		Self {
			center: self.center + offset,
			half_extents: half,
		}
	}

	/// Octant index of the child that contains `point`.
	///
	/// Points on a split plane go to the upper child.
	#[inline]
	pub fn octant_of(&self, point: DVec3) -> u8 {
		let mut octant = 0;
		if point.x >= self.center.x {
			octant |= 1;
		}
		if point.y >= self.center.y {
			octant |= 2;
		}
		if point.z >= self.center.z {
			octant |= 4;
		}
		octant
	}

	/// Check if the interiors of two boxes overlap (positive volume).
	///
	/// Boxes that only share a face, edge or corner do not intersect.
	#[inline]
	pub fn intersects(&self, other: &Bounds) -> bool {
		let (a_min, a_max) = (self.min(), self.max());
		let (b_min, b_max) = (other.min(), other.max());
		a_min.x < b_max.x
			&& a_max.x > b_min.x
			&& a_min.y < b_max.y
			&& a_max.y > b_min.y
			&& a_min.z < b_max.z
			&& a_max.z > b_min.z
	}

	/// Check if two boxes share any interior or boundary points.
	#[inline]
	pub fn touches(&self, other: &Bounds) -> bool {
		self.gap(other) == DVec3::ZERO
	}

	/// Check if this box contains a point (boundary inclusive).
	#[inline]
	pub fn contains_point(&self, point: DVec3) -> bool {
		let d = (point - self.center).abs();
		d.x <= self.half_extents.x && d.y <= self.half_extents.y && d.z <= self.half_extents.z
	}

	/// Closest point inside the box to `point`.
	#[inline]
	pub fn closest_point(&self, point: DVec3) -> DVec3 {
		point.clamp(self.min(), self.max())
	}

	/// Squared distance from `point` to the box (0 inside).
	#[inline]
	pub fn distance_squared_to(&self, point: DVec3) -> f64 {
		self.closest_point(point).distance_squared(point)
	}

	/// Box shrunk by `skin` on every side, never below zero size.
	pub fn shrunk(&self, skin: f64) -> Self {
		Self {
			center: self.center,
			half_extents: (self.half_extents - DVec3::splat(skin)).max(DVec3::ZERO),
		}
	}

	/// Per-axis separation between two boxes (0 where they overlap or touch).
	#[inline]
	pub fn gap(&self, other: &Bounds) -> DVec3 {
		let lo = self.min().max(other.min());
		let hi = self.max().min(other.max());
		(lo - hi).max(DVec3::ZERO)
	}

	/// Center of the region two adjacent boxes share.
	///
	/// For face neighbors this is the center of the shared face patch; for
	/// edge or corner neighbors it lies on the shared edge or corner. Small
	/// gaps within tolerance collapse to their midpoint.
	#[inline]
	pub fn shared_region_center(&self, other: &Bounds) -> DVec3 {
		let lo = self.min().max(other.min());
		let hi = self.max().min(other.max());
		(lo + hi) * 0.5
	}
}
