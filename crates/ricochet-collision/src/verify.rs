//! Consistency checks for resolved positions.
//!
//! A resolved circle overlapping an obstacle means the skin logic is wrong.
//! These checks only log; they are never reported to the actor.

use glam::Vec2;
use ricochet_common::ObstacleId;
use thiserror::Error;
use tracing::error;

use crate::overlap::circle_overlaps_aabb;
use crate::params::CollisionParams;
use crate::shapes::Circle;
use crate::world::ObstacleQuery;

/// A resolved circle still overlaps an obstacle.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("circle at ({}, {}) overlaps {obstacle} by {depth}", .position.x, .position.y)]
pub struct Penetration {
    /// Obstacle overlapped
    pub obstacle: ObstacleId,
    /// Circle center
    pub position: Vec2,
    /// How far the circle reaches into the obstacle
    pub depth: f32,
}

/// Checks that `circle` overlaps none of the world's obstacles.
pub fn check_non_penetration<W>(world: &W, circle: &Circle) -> Result<(), Penetration>
where
    W: ObstacleQuery + ?Sized,
{
    for (id, aabb) in world.obstacles() {
        if circle_overlaps_aabb(circle, aabb) {
            let closest = aabb.closest_point(circle.center());
            return Err(Penetration {
                obstacle: id,
                position: circle.center(),
                depth: circle.radius() - closest.distance(circle.center()),
            });
        }
    }
    Ok(())
}

/// Runs [`check_non_penetration`] when invariant checks are enabled.
pub(crate) fn audit<W>(world: &W, circle: &Circle, params: &CollisionParams, context: &str)
where
    W: ObstacleQuery + ?Sized,
{
    if !params.check_invariants {
        return;
    }
    if let Err(penetration) = check_non_penetration(world, circle) {
        error!("{context}: {penetration}");
    }
}
