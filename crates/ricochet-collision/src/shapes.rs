//! Geometric primitives for collision queries.
//!
//! All shapes are plain values. [`Aabb`] and [`Circle`] validate their
//! invariants once at construction and are trusted by every query after that.

use glam::Vec2;
use ricochet_common::{GeometryError, ShapeKind};
use serde::{Deserialize, Serialize};

/// One of the two world axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// Horizontal axis
    X,
    /// Vertical axis (+y points down, towards the ground)
    Y,
}

impl Axis {
    /// Both axes, in slab-test order.
    pub const ALL: [Axis; 2] = [Axis::X, Axis::Y];

    /// Returns the component of `v` along this axis.
    #[must_use]
    pub fn of(self, v: Vec2) -> f32 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
        }
    }

    /// Returns the other axis.
    #[must_use]
    pub fn other(self) -> Self {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::X,
        }
    }
}

/// The axis-aligned face of an obstacle that was struck.
///
/// Faces are named by the sign of their outward normal: `Left` is the min-x
/// face, `Right` the max-x face, `Down` the min-y face and `Up` the max-y
/// face. With +y pointing towards the ground, a falling actor lands on a
/// `Down` face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    /// Nothing was struck
    #[default]
    None,
    /// Max-y face (actor was moving -y)
    Up,
    /// Min-y face (actor was moving +y)
    Down,
    /// Min-x face (actor was moving +x)
    Left,
    /// Max-x face (actor was moving -x)
    Right,
}

impl Direction {
    /// Face struck by motion with the given sign along `axis`.
    ///
    /// Positive motion enters through the min face of that axis.
    #[must_use]
    pub fn struck_by(axis: Axis, motion: f32) -> Self {
        match (axis, motion > 0.0) {
            (Axis::X, true) => Direction::Left,
            (Axis::X, false) => Direction::Right,
            (Axis::Y, true) => Direction::Down,
            (Axis::Y, false) => Direction::Up,
        }
    }

    /// Axis the face is perpendicular to, or `None` for [`Direction::None`].
    #[must_use]
    pub fn axis(self) -> Option<Axis> {
        match self {
            Direction::None => None,
            Direction::Left | Direction::Right => Some(Axis::X),
            Direction::Up | Direction::Down => Some(Axis::Y),
        }
    }

    /// The opposite face.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Direction::None => Direction::None,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Outward unit normal of the face (zero for [`Direction::None`]).
    #[must_use]
    pub fn normal(self) -> Vec2 {
        match self {
            Direction::None => Vec2::ZERO,
            Direction::Up => Vec2::Y,
            Direction::Down => Vec2::NEG_Y,
            Direction::Left => Vec2::NEG_X,
            Direction::Right => Vec2::X,
        }
    }

    /// Whether something was struck.
    #[must_use]
    pub fn is_hit(self) -> bool {
        self != Direction::None
    }

    /// Left or right face.
    #[must_use]
    pub fn is_horizontal(self) -> bool {
        self.axis() == Some(Axis::X)
    }

    /// Up or down face.
    #[must_use]
    pub fn is_vertical(self) -> bool {
        self.axis() == Some(Axis::Y)
    }
}

/// Serialized form of an [`Aabb`], validated on the way in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct AabbDef {
    center: Vec2,
    half_extents: Vec2,
}

/// Axis-aligned bounding box stored as center and half-extents.
///
/// Half-extents are strictly positive on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AabbDef", into = "AabbDef")]
pub struct Aabb {
    center: Vec2,
    half_extents: Vec2,
}

impl Aabb {
    /// Creates a box from its center and half-extents.
    pub fn new(center: Vec2, half_extents: Vec2) -> Result<Self, GeometryError> {
        if !center.is_finite() || !half_extents.is_finite() {
            return Err(GeometryError::NonFinite {
                shape: ShapeKind::Aabb,
            });
        }
        if half_extents.x <= 0.0 || half_extents.y <= 0.0 {
            return Err(GeometryError::degenerate(
                ShapeKind::Aabb,
                format!(
                    "half-extents must be positive, got ({}, {})",
                    half_extents.x, half_extents.y
                ),
            ));
        }
        Ok(Self {
            center,
            half_extents,
        })
    }

    /// Creates a box from its min and max corners.
    pub fn from_min_max(min: Vec2, max: Vec2) -> Result<Self, GeometryError> {
        Self::new((min + max) * 0.5, (max - min) * 0.5)
    }

    /// Builds a box whose half-extents are known to be positive.
    pub(crate) fn from_parts(center: Vec2, half_extents: Vec2) -> Self {
        debug_assert!(half_extents.x > 0.0 && half_extents.y > 0.0);
        Self {
            center,
            half_extents,
        }
    }

    /// Center of the box.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.center
    }

    /// Half-extents of the box.
    #[must_use]
    pub fn half_extents(&self) -> Vec2 {
        self.half_extents
    }

    /// Lowest coordinate along `axis`.
    #[must_use]
    pub fn min(&self, axis: Axis) -> f32 {
        axis.of(self.center) - axis.of(self.half_extents)
    }

    /// Highest coordinate along `axis`.
    #[must_use]
    pub fn max(&self, axis: Axis) -> f32 {
        axis.of(self.center) + axis.of(self.half_extents)
    }

    /// Min corner.
    #[must_use]
    pub fn min_corner(&self) -> Vec2 {
        self.center - self.half_extents
    }

    /// Max corner.
    #[must_use]
    pub fn max_corner(&self) -> Vec2 {
        self.center + self.half_extents
    }

    /// Width of the box.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.half_extents.x * 2.0
    }

    /// Height of the box.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.half_extents.y * 2.0
    }

    /// Returns the box grown by `margin` on every side.
    ///
    /// Negative margins are treated as zero so the result stays valid.
    #[must_use]
    pub fn expanded(&self, margin: f32) -> Self {
        Self::from_parts(self.center, self.half_extents + Vec2::splat(margin.max(0.0)))
    }

    /// Returns the box translated by `offset`.
    #[must_use]
    pub fn translated(&self, offset: Vec2) -> Self {
        Self::from_parts(self.center + offset, self.half_extents)
    }

    /// Corner of the box on the same side as `p` on both axes.
    #[must_use]
    pub fn corner_towards(&self, p: Vec2) -> Vec2 {
        let sx = if p.x < self.center.x { -1.0 } else { 1.0 };
        let sy = if p.y < self.center.y { -1.0 } else { 1.0 };
        self.center + self.half_extents * Vec2::new(sx, sy)
    }

    /// Point of the box closest to `p`.
    #[must_use]
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min_corner(), self.max_corner())
    }
}

impl TryFrom<AabbDef> for Aabb {
    type Error = GeometryError;

    fn try_from(def: AabbDef) -> Result<Self, Self::Error> {
        Self::new(def.center, def.half_extents)
    }
}

impl From<Aabb> for AabbDef {
    fn from(aabb: Aabb) -> Self {
        Self {
            center: aabb.center,
            half_extents: aabb.half_extents,
        }
    }
}

/// Serialized form of a [`Circle`], validated on the way in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct CircleDef {
    center: Vec2,
    radius: f32,
}

/// A circle with non-negative radius; the collision volume of a moving actor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CircleDef", into = "CircleDef")]
pub struct Circle {
    center: Vec2,
    radius: f32,
}

impl Circle {
    /// Creates a circle.
    pub fn new(center: Vec2, radius: f32) -> Result<Self, GeometryError> {
        if !center.is_finite() || !radius.is_finite() {
            return Err(GeometryError::NonFinite {
                shape: ShapeKind::Circle,
            });
        }
        if radius < 0.0 {
            return Err(GeometryError::degenerate(
                ShapeKind::Circle,
                format!("radius must be non-negative, got {radius}"),
            ));
        }
        Ok(Self { center, radius })
    }

    /// Center of the circle.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.center
    }

    /// Radius of the circle.
    #[must_use]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Same radius, new center.
    #[must_use]
    pub fn with_center(&self, center: Vec2) -> Self {
        Self {
            center,
            radius: self.radius,
        }
    }

    /// Returns the circle translated by `offset`.
    #[must_use]
    pub fn translated(&self, offset: Vec2) -> Self {
        self.with_center(self.center + offset)
    }
}

impl TryFrom<CircleDef> for Circle {
    type Error = GeometryError;

    fn try_from(def: CircleDef) -> Result<Self, Self::Error> {
        Self::new(def.center, def.radius)
    }
}

impl From<Circle> for CircleDef {
    fn from(circle: Circle) -> Self {
        Self {
            center: circle.center,
            radius: circle.radius,
        }
    }
}

/// A line segment from `a` to `b`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Start point
    pub a: Vec2,
    /// End point
    pub b: Vec2,
}

impl Segment {
    /// Creates a segment.
    #[must_use]
    pub const fn new(a: Vec2, b: Vec2) -> Self {
        Self { a, b }
    }

    /// Segment starting at `origin` covering `displacement`.
    #[must_use]
    pub fn from_motion(origin: Vec2, displacement: Vec2) -> Self {
        Self::new(origin, origin + displacement)
    }

    /// Vector from `a` to `b`.
    #[must_use]
    pub fn delta(&self) -> Vec2 {
        self.b - self.a
    }

    /// Length of the segment.
    #[must_use]
    pub fn length(&self) -> f32 {
        self.delta().length()
    }

    /// Point at parameter `t` (0 at `a`, 1 at `b`).
    #[must_use]
    pub fn point_at(&self, t: f32) -> Vec2 {
        self.a + self.delta() * t
    }
}

/// A ray. The direction does not need to be unit length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    /// Start point
    pub origin: Vec2,
    /// Direction (scaled by the parameter `t`)
    pub direction: Vec2,
}

impl Ray {
    /// Creates a ray.
    #[must_use]
    pub const fn new(origin: Vec2, direction: Vec2) -> Self {
        Self { origin, direction }
    }

    /// Point at parameter `t`.
    #[must_use]
    pub fn point_at(&self, t: f32) -> Vec2 {
        self.origin + self.direction * t
    }
}
