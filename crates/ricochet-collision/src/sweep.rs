//! Swept circle versus box, the continuous collision core.
//!
//! The box is grown by the circle radius so the moving circle becomes a ray
//! against the grown box. Flat faces of the grown box are exact; its corners
//! are not, so entries in a corner Voronoi region are re-tested against a
//! circle of the same radius placed on the real corner.

use glam::Vec2;

use crate::intersect::{ray_vs_aabb, segment_vs_circle};
use crate::shapes::{Aabb, Axis, Circle, Direction, Ray, Segment};

/// Displacements with a squared length below this are treated as no motion.
pub const MIN_DISPLACEMENT_SQ: f32 = 1e-12;

/// First contact of a moving circle with one box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepHit {
    /// Fraction of the displacement travelled before contact (0..=1)
    pub t: f32,
    /// Circle center at contact, pushed off the struck face by the skin
    pub position: Vec2,
    /// Face of the box that was struck
    pub direction: Direction,
}

/// Sweeps `circle` along `displacement` against `aabb`.
///
/// `skin` is the distance the resulting position is pushed back along the
/// struck face's normal so that a later overlap test does not report the
/// touching circle as overlapping.
#[must_use]
pub fn sweep_circle_aabb(
    circle: &Circle,
    displacement: Vec2,
    aabb: &Aabb,
    skin: f32,
) -> Option<SweepHit> {
    if displacement.length_squared() <= MIN_DISPLACEMENT_SQ {
        return None;
    }

    let origin = circle.center();
    let grown = aabb.expanded(circle.radius());
    let hit = ray_vs_aabb(&Ray::new(origin, displacement), &grown)?;
    if hit.t > 1.0 {
        return None;
    }

    let beyond_x = hit.point.x < aabb.min(Axis::X) || hit.point.x > aabb.max(Axis::X);
    let beyond_y = hit.point.y < aabb.min(Axis::Y) || hit.point.y > aabb.max(Axis::Y);

    let (t, direction) = if beyond_x && beyond_y {
        let corner = circle.with_center(aabb.corner_towards(hit.point));
        let path = Segment::from_motion(origin, displacement);
        let corner_hit = segment_vs_circle(&path, &corner)?;
        let offset = corner_hit.point - corner.center();
        (corner_hit.t, corner_face(offset, displacement, hit.direction))
    } else if hit.started_inside {
        face_contact_from_inside(origin, displacement, aabb)?
    } else {
        (hit.t, hit.direction)
    };

    Some(SweepHit {
        t,
        position: origin + displacement * t + direction.normal() * skin,
        direction,
    })
}

/// Face named for a contact at `offset` from a box corner.
///
/// Only a face whose axis the motion moves into can be struck. When motion
/// enters along both axes, the axis the contact normal leans on most wins.
fn corner_face(offset: Vec2, displacement: Vec2, fallback: Direction) -> Direction {
    let entering = |axis: Axis| axis.of(displacement) * axis.of(offset) < 0.0;
    let axis = match (entering(Axis::X), entering(Axis::Y)) {
        (true, true) if offset.x.abs() >= offset.y.abs() => Axis::X,
        (true, true) | (false, true) => Axis::Y,
        (true, false) => Axis::X,
        (false, false) => return fallback,
    };
    Direction::struck_by(axis, axis.of(displacement))
}

/// Contact for a circle whose center already lies inside the grown box
/// outside the corner regions, i.e. one that touches or overlaps a face.
///
/// Motion towards the box stops immediately; motion away is free.
fn face_contact_from_inside(
    origin: Vec2,
    displacement: Vec2,
    aabb: &Aabb,
) -> Option<(f32, Direction)> {
    let offset = origin - aabb.center();
    let half = aabb.half_extents();
    let within_x = offset.x.abs() <= half.x;
    let within_y = offset.y.abs() <= half.y;

    let axis = match (within_x, within_y) {
        (true, false) => Axis::Y,
        (false, true) => Axis::X,
        _ => {
            let depth = half - offset.abs();
            if depth.x < depth.y {
                Axis::X
            } else {
                Axis::Y
            }
        },
    };

    let motion = axis.of(displacement);
    if motion * axis.of(offset) < 0.0 {
        Some((0.0, Direction::struck_by(axis, motion)))
    } else {
        None
    }
}
