//! Static overlap predicates.
//!
//! All comparisons are strict: shapes that only touch do not overlap.

use glam::Vec2;

use crate::shapes::{Aabb, Circle};

/// Checks whether `p` lies strictly inside `aabb`.
#[must_use]
pub fn point_in_aabb(p: Vec2, aabb: &Aabb) -> bool {
    let d = (aabb.center() - p).abs();
    let h = aabb.half_extents();
    d.x < h.x && d.y < h.y
}

/// Checks whether `circle` overlaps `aabb`.
#[must_use]
pub fn circle_overlaps_aabb(circle: &Circle, aabb: &Aabb) -> bool {
    // Per-axis distance past the box face, zero when within the slab.
    let excess = ((circle.center() - aabb.center()).abs() - aabb.half_extents()).max(Vec2::ZERO);
    excess.length_squared() < circle.radius() * circle.radius()
}

/// Checks whether two boxes overlap.
#[must_use]
pub fn aabb_overlaps_aabb(a: &Aabb, b: &Aabb) -> bool {
    let d = (a.center() - b.center()).abs();
    let h = a.half_extents() + b.half_extents();
    d.x < h.x && d.y < h.y
}
