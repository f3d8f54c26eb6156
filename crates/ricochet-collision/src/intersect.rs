//! Ray and segment intersection routines.
//!
//! Degenerate inputs (zero-length directions, parallel or collinear
//! segments) never produce a hit; callers must not expect a parameter or
//! point in those cases.

use std::f32::consts::FRAC_PI_4;

use glam::Vec2;

use crate::shapes::{Aabb, Axis, Circle, Direction, Ray, Segment};

/// Direction components below this magnitude are treated as parallel to a slab.
pub const PARALLEL_EPSILON: f32 = 1e-7;

/// Squared lengths below this are treated as zero-length directions.
const DEGENERATE_LENGTH_SQ: f32 = 1e-12;

/// Intersection of two segments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentHit {
    /// Parameter along the first segment (0..=1)
    pub t: f32,
    /// Intersection point
    pub point: Vec2,
}

/// Intersection of a segment with a circle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleHit {
    /// Parameter along the segment (0..=1)
    pub t: f32,
    /// Point of first contact
    pub point: Vec2,
    /// Side the circle was struck from, opposite the impact sector
    pub direction: Direction,
}

/// Intersection of a ray with a box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Ray parameter of the entry (clamped to 0 when the origin is inside)
    pub t: f32,
    /// Ray parameter of the exit
    pub t_exit: f32,
    /// Entry point
    pub point: Vec2,
    /// Face entered through
    pub direction: Direction,
    /// Whether the ray origin was already inside the box
    pub started_inside: bool,
}

/// Twice the signed area of triangle `abc`; positive when counter-clockwise.
fn signed_area(a: Vec2, b: Vec2, c: Vec2) -> f32 {
    (a.x - c.x) * (b.y - c.y) - (a.y - c.y) * (b.x - c.x)
}

/// Intersects segment `first` with segment `second`.
///
/// Both segments must strictly straddle each other. Collinear segments and
/// segments that only touch at an endpoint do not intersect.
#[must_use]
pub fn segment_vs_segment(first: &Segment, second: &Segment) -> Option<SegmentHit> {
    let a1 = signed_area(first.a, first.b, second.b);
    let a2 = signed_area(first.a, first.b, second.a);
    if a1 * a2 >= 0.0 {
        return None;
    }

    let a3 = signed_area(second.a, second.b, first.a);
    let a4 = a3 + a2 - a1;
    if a3 * a4 >= 0.0 {
        return None;
    }

    let t = a3 / (a3 - a4);
    Some(SegmentHit {
        t,
        point: first.point_at(t),
    })
}

/// Intersects a ray with a circle, returning the ray parameter of first contact.
///
/// Returns `Some(0.0)` when the origin starts inside the circle.
#[must_use]
pub fn ray_vs_circle(ray: &Ray, circle: &Circle) -> Option<f32> {
    let a = ray.direction.length_squared();
    if a <= DEGENERATE_LENGTH_SQ {
        return None;
    }

    let m = ray.origin - circle.center();
    let b = m.dot(ray.direction);
    let c = m.length_squared() - circle.radius() * circle.radius();

    // Outside or touching, and not approaching.
    if c >= 0.0 && b >= 0.0 {
        return None;
    }

    let discriminant = b * b - a * c;
    if discriminant < 0.0 {
        return None;
    }

    let t = (-b - discriminant.sqrt()) / a;
    Some(t.max(0.0))
}

/// Maps an offset from a circle's center to the side it was struck from.
///
/// The circle is split into four 90 degree sectors centred on the axes. The
/// reported direction is the one opposite the sector containing the impact:
/// an impact in the +y sector reports [`Direction::Down`].
#[must_use]
pub fn struck_from(offset: Vec2) -> Direction {
    let angle = offset.y.atan2(offset.x);
    if angle.abs() <= FRAC_PI_4 {
        Direction::Left
    } else if angle > FRAC_PI_4 && angle <= 3.0 * FRAC_PI_4 {
        Direction::Down
    } else if angle < -FRAC_PI_4 && angle > -3.0 * FRAC_PI_4 {
        Direction::Up
    } else {
        Direction::Right
    }
}

/// Intersects a segment with a circle.
#[must_use]
pub fn segment_vs_circle(segment: &Segment, circle: &Circle) -> Option<CircleHit> {
    let delta = segment.delta();
    let length = delta.length();
    if length * length <= DEGENERATE_LENGTH_SQ {
        return None;
    }

    let ray = Ray::new(segment.a, delta / length);
    let distance = ray_vs_circle(&ray, circle)?;
    if distance > length {
        return None;
    }

    let point = ray.point_at(distance);
    Some(CircleHit {
        t: distance / length,
        point,
        direction: struck_from(point - circle.center()),
    })
}

/// Intersects a ray with a box using the slab method.
///
/// A ray with no usable direction on either axis never hits. Hits behind the
/// origin are rejected; hits beyond any particular length are left to the
/// caller.
#[must_use]
pub fn ray_vs_aabb(ray: &Ray, aabb: &Aabb) -> Option<RayHit> {
    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;
    let mut entry_axis = None;

    for axis in Axis::ALL {
        let origin = axis.of(ray.origin);
        let dir = axis.of(ray.direction);
        let (lo, hi) = (aabb.min(axis), aabb.max(axis));

        if dir.abs() < PARALLEL_EPSILON {
            if origin < lo || origin > hi {
                return None;
            }
            continue;
        }

        let inv = 1.0 / dir;
        let mut near = (lo - origin) * inv;
        let mut far = (hi - origin) * inv;
        if near > far {
            std::mem::swap(&mut near, &mut far);
        }

        if near > t_enter {
            t_enter = near;
            entry_axis = Some(axis);
        }
        t_exit = t_exit.min(far);

        if t_enter > t_exit {
            return None;
        }
    }

    let axis = entry_axis?;
    if t_exit < 0.0 {
        return None;
    }

    let t = t_enter.max(0.0);
    Some(RayHit {
        t,
        t_exit,
        point: ray.point_at(t),
        direction: Direction::struck_by(axis, axis.of(ray.direction)),
        started_inside: t_enter < 0.0,
    })
}
