//! Bounce resolution for ballistic bodies.
//!
//! A ballistic body reflects off every face it strikes, losing speed on the
//! reflected axis according to its rebound coefficient, until the frame's
//! time budget is spent or the iteration cap is reached.

use glam::Vec2;
use ricochet_common::ObstacleId;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::params::CollisionParams;
use crate::query::first_collision;
use crate::resolve::{reflect, Resolution, UnresolvedCollision};
use crate::shapes::{Circle, Direction};
use crate::verify::audit;
use crate::world::ObstacleQuery;

/// Outcome of one ballistic move.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallisticMoveResult {
    /// Final circle center
    pub position: Vec2,
    /// Velocity after every bounce this frame
    pub velocity: Vec2,
    /// Last face struck, [`Direction::None`] if nothing was hit
    pub direction: Direction,
    /// Last obstacle struck
    pub obstacle: Option<ObstacleId>,
    /// Whether the move settled within the iteration cap
    pub resolution: Resolution,
}

/// Moves a ballistic body for `dt` seconds, bouncing off static obstacles.
///
/// `rebound` is the fraction of speed kept on the reflected axis: `0.0`
/// stops it dead, `1.0` is perfectly elastic.
pub fn ballistic_move<W>(
    world: &W,
    circle: &Circle,
    velocity: Vec2,
    dt: f32,
    rebound: f32,
    params: &CollisionParams,
) -> BallisticMoveResult
where
    W: ObstacleQuery + ?Sized,
{
    let mut body = *circle;
    let mut velocity = velocity;
    let mut remaining = dt;
    let mut direction = Direction::None;
    let mut obstacle = None;

    for iteration in 0..params.max_bounce_iterations {
        let data = first_collision(world, &body, velocity * remaining, params);
        body = body.with_center(data.position);

        if !data.is_hit() {
            audit(world, &body, params, "ballistic move");
            return BallisticMoveResult {
                position: body.center(),
                velocity,
                direction,
                obstacle,
                resolution: Resolution::Resolved,
            };
        }

        velocity = reflect(velocity, data.direction, rebound);
        remaining *= 1.0 - data.t;
        direction = data.direction;
        obstacle = data.obstacle;

        debug!(
            "bounce {} off {:?} face, velocity now ({:.2}, {:.2})",
            iteration + 1,
            data.direction,
            velocity.x,
            velocity.y
        );
    }

    let reason = UnresolvedCollision {
        iterations: params.max_bounce_iterations,
        remaining_time: remaining,
    };
    warn!("Ballistic move stopped early: {reason}");
    audit(world, &body, params, "ballistic move");

    BallisticMoveResult {
        position: body.center(),
        velocity,
        direction,
        obstacle,
        resolution: Resolution::Partial { reason },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlap::circle_overlaps_aabb;
    use crate::shapes::Aabb;
    use proptest::prelude::*;

    fn aabb(cx: f32, cy: f32, hx: f32, hy: f32) -> Aabb {
        Aabb::new(Vec2::new(cx, cy), Vec2::new(hx, hy)).expect("valid box")
    }

    fn circle(x: f32, y: f32, r: f32) -> Circle {
        Circle::new(Vec2::new(x, y), r).expect("valid circle")
    }

    fn floor() -> Vec<Aabb> {
        vec![aabb(0.0, 100.0, 500.0, 10.0)]
    }

    #[test]
    fn test_free_flight() {
        let result = ballistic_move(
            &floor(),
            &circle(0.0, 0.0, 5.0),
            Vec2::new(10.0, 20.0),
            0.5,
            1.0,
            &CollisionParams::default(),
        );
        assert_eq!(result.position, Vec2::new(5.0, 10.0));
        assert_eq!(result.velocity, Vec2::new(10.0, 20.0));
        assert_eq!(result.direction, Direction::None);
        assert!(result.resolution.is_resolved());
    }

    #[test]
    fn test_elastic_bounce_off_floor() {
        // Floor top at y = 90; contact at y = 85 after 85 of 170 units.
        let result = ballistic_move(
            &floor(),
            &circle(0.0, 0.0, 5.0),
            Vec2::new(0.0, 170.0),
            1.0,
            1.0,
            &CollisionParams::default(),
        );
        assert_eq!(result.direction, Direction::Down);
        assert_eq!(result.obstacle, Some(ObstacleId::new(0)));
        assert_eq!(result.velocity, Vec2::new(0.0, -170.0));
        assert!((result.position.y - 0.0).abs() < 0.05);
        assert!(result.resolution.is_resolved());
    }

    #[test]
    fn test_elastic_bounce_preserves_speed() {
        let velocity = Vec2::new(60.0, 170.0);
        let result = ballistic_move(
            &floor(),
            &circle(0.0, 0.0, 5.0),
            velocity,
            1.0,
            1.0,
            &CollisionParams::default(),
        );
        assert_eq!(result.direction, Direction::Down);
        assert!((result.velocity.length() - velocity.length()).abs() < 1e-3);
    }

    #[test]
    fn test_inelastic_bounce_zeroes_axis() {
        let result = ballistic_move(
            &floor(),
            &circle(0.0, 0.0, 5.0),
            Vec2::new(30.0, 170.0),
            1.0,
            0.0,
            &CollisionParams::default(),
        );
        assert_eq!(result.velocity.y.abs(), 0.0);
        assert_eq!(result.velocity.x, 30.0);
        // Slides along the floor for the rest of the frame.
        assert!((result.position.x - 30.0).abs() < 0.05);
        assert!(result.position.y < 85.0);
    }

    #[test]
    fn test_repeated_contacts_flip_each_frame() {
        let world = floor();
        let params = CollisionParams::default();
        let mut ball = circle(0.0, 60.0, 5.0);
        let mut velocity = Vec2::new(0.0, 100.0);

        let mut signs = Vec::new();
        for _ in 0..6 {
            let result = ballistic_move(&world, &ball, velocity, 0.5, 1.0, &params);
            ball = ball.with_center(result.position);
            velocity = result.velocity;
            signs.push(velocity.y.signum());
            assert!(!circle_overlaps_aabb(&ball, &world[0]));
        }
        // Alternates between floor contacts and free flight.
        assert!(signs.contains(&-1.0));
        assert!(signs.contains(&1.0));
        assert_eq!(velocity.y.abs(), 100.0);
    }

    #[test]
    fn test_horizontal_corner_graze_bounces_back() {
        // Passes within one radius of the box's top-left corner (80, 9).
        let world = vec![aabb(100.0, 29.0, 20.0, 20.0)];
        let params = CollisionParams::default();
        let mut ball = circle(0.0, 0.0, 10.0);
        let mut velocity = Vec2::new(200.0, 0.0);

        let first = ballistic_move(&world, &ball, velocity, 1.0, 1.0, &params);
        assert_eq!(first.direction, Direction::Left);
        assert_eq!(first.velocity, Vec2::new(-200.0, 0.0));
        assert!(first.resolution.is_resolved());
        assert!(first.position.x < 0.0);

        for _ in 0..10 {
            let result = ballistic_move(&world, &ball, velocity, 0.1, 1.0, &params);
            assert!(result.resolution.is_resolved());
            ball = ball.with_center(result.position);
            velocity = result.velocity;
            assert!(!circle_overlaps_aabb(&ball, &world[0]));
        }
        assert!(velocity.x < 0.0);
    }

    #[test]
    fn test_iteration_cap_returns_partial() {
        // Narrow shaft with a very fast ball.
        let world = vec![aabb(-20.0, 0.0, 10.0, 500.0), aabb(20.0, 0.0, 10.0, 500.0)];
        let params = CollisionParams::default().with_max_bounce_iterations(5);
        let ball = circle(0.0, 0.0, 2.0);
        let result = ballistic_move(&world, &ball, Vec2::new(1_000.0, 0.0), 1.0, 1.0, &params);

        let reason = result.resolution.reason().expect("cap reached");
        assert_eq!(reason.iterations, 5);
        assert!(reason.remaining_time > 0.0);
        let end = ball.with_center(result.position);
        assert!(world.iter().all(|b| !circle_overlaps_aabb(&end, b)));
        assert!(result.position.x.abs() < 8.0);
    }

    proptest! {
        #[test]
        fn prop_bounce_energy_policy(
            vx in -300.0f32..300.0,
            vy in 100.0f32..300.0,
            elastic in proptest::bool::ANY,
        ) {
            let rebound = if elastic { 1.0 } else { 0.0 };
            let velocity = Vec2::new(vx, vy);
            let result = ballistic_move(
                &floor(),
                &circle(0.0, 60.0, 5.0),
                velocity,
                1.0,
                rebound,
                &CollisionParams::default(),
            );
            prop_assert_eq!(result.direction, Direction::Down);
            if elastic {
                prop_assert!((result.velocity.length() - velocity.length()).abs() < 1e-2);
            } else {
                prop_assert_eq!(result.velocity.y.abs(), 0.0);
            }
        }
    }
}
