//! Broad-phase culling and the first-collision query.
//!
//! [`first_collision`] is the only entry point the resolvers use; neither
//! does its own culling or per-box math.

use glam::Vec2;
use ricochet_common::ObstacleId;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::overlap::aabb_overlaps_aabb;
use crate::params::CollisionParams;
use crate::shapes::{Aabb, Circle, Direction};
use crate::sweep::{sweep_circle_aabb, SweepHit, MIN_DISPLACEMENT_SQ};
use crate::world::ObstacleQuery;

/// Smallest half-extent of a culling box; keeps it a valid [`Aabb`].
const MIN_CULL_HALF_EXTENT: f32 = 1e-4;

/// Outcome of one continuous collision query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionData {
    /// Circle center after the safe part of the move
    pub position: Vec2,
    /// Fraction of the requested displacement before contact (0..=1)
    pub t: f32,
    /// Face struck, [`Direction::None`] if the whole move is safe
    pub direction: Direction,
    /// Handle of the obstacle struck
    pub obstacle: Option<ObstacleId>,
}

impl CollisionData {
    /// The full move completed without contact.
    #[must_use]
    pub fn clear(start: Vec2, displacement: Vec2) -> Self {
        Self {
            position: start + displacement,
            t: 1.0,
            direction: Direction::None,
            obstacle: None,
        }
    }

    /// Contact with `obstacle`.
    #[must_use]
    pub fn hit(obstacle: ObstacleId, sweep: SweepHit) -> Self {
        Self {
            position: sweep.position,
            t: sweep.t.clamp(0.0, 1.0),
            direction: sweep.direction,
            obstacle: Some(obstacle),
        }
    }

    /// Whether something was struck.
    #[must_use]
    pub fn is_hit(&self) -> bool {
        self.direction.is_hit()
    }
}

/// Box covering every point the circle can touch during the move.
///
/// An obstacle that does not overlap it cannot be struck.
#[must_use]
pub fn broad_phase_bounds(circle: &Circle, displacement: Vec2, pad: f32) -> Aabb {
    let half = displacement.abs() * 0.5 + Vec2::splat(circle.radius() + pad.max(0.0));
    Aabb::from_parts(
        circle.center() + displacement * 0.5,
        half.max(Vec2::splat(MIN_CULL_HALF_EXTENT)),
    )
}

/// Obstacles that survive culling against `bounds`.
pub fn broad_phase<'a, W>(
    world: &'a W,
    bounds: Aabb,
) -> impl Iterator<Item = (ObstacleId, &'a Aabb)> + 'a
where
    W: ObstacleQuery + ?Sized,
{
    world
        .obstacles()
        .filter(move |(_, aabb)| aabb_overlaps_aabb(&bounds, aabb))
}

/// Finds the earliest obstacle struck by `circle` moving by `displacement`.
pub fn first_collision<W>(
    world: &W,
    circle: &Circle,
    displacement: Vec2,
    params: &CollisionParams,
) -> CollisionData
where
    W: ObstacleQuery + ?Sized,
{
    let start = circle.center();
    if displacement.length_squared() <= MIN_DISPLACEMENT_SQ {
        return CollisionData::clear(start, Vec2::ZERO);
    }

    let bounds = broad_phase_bounds(circle, displacement, params.broad_phase_pad);
    let skin = params.skin_for(circle.radius());

    let mut earliest: Option<(ObstacleId, SweepHit)> = None;
    for (id, aabb) in broad_phase(world, bounds) {
        let Some(hit) = sweep_circle_aabb(circle, displacement, aabb, skin) else {
            continue;
        };
        if earliest.map_or(true, |(_, best)| hit.t < best.t) {
            earliest = Some((id, hit));
        }
    }

    match earliest {
        Some((id, hit)) => {
            trace!(
                "hit {} at t={:.4} on {:?} face, stopped at ({:.3}, {:.3})",
                id,
                hit.t,
                hit.direction,
                hit.position.x,
                hit.position.y
            );
            CollisionData::hit(id, hit)
        },
        None => CollisionData::clear(start, displacement),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlap::circle_overlaps_aabb;
    use crate::world::StaticWorld;
    use proptest::prelude::*;

    fn aabb(cx: f32, cy: f32, hx: f32, hy: f32) -> Aabb {
        Aabb::new(Vec2::new(cx, cy), Vec2::new(hx, hy)).expect("valid box")
    }

    fn circle(x: f32, y: f32, r: f32) -> Circle {
        Circle::new(Vec2::new(x, y), r).expect("valid circle")
    }

    fn params() -> CollisionParams {
        CollisionParams::default()
    }

    #[test]
    fn test_scenario_head_on() {
        let world = vec![aabb(100.0, 0.0, 20.0, 20.0)];
        let data = first_collision(&world, &circle(0.0, 0.0, 10.0), Vec2::new(200.0, 0.0), &params());
        assert_eq!(data.direction, Direction::Left);
        assert_eq!(data.obstacle, Some(ObstacleId::new(0)));
        assert!((data.position.x - 70.0).abs() < 0.02);
        assert!(data.t < 1.0);
    }

    #[test]
    fn test_scenario_zero_displacement() {
        let world = vec![aabb(100.0, 0.0, 20.0, 20.0)];
        let data = first_collision(&world, &circle(0.0, 0.0, 10.0), Vec2::ZERO, &params());
        assert_eq!(data.direction, Direction::None);
        assert_eq!(data.t, 1.0);
        assert_eq!(data.position, Vec2::ZERO);
        assert!(data.obstacle.is_none());
    }

    #[test]
    fn test_clear_path() {
        let world = vec![aabb(100.0, 100.0, 5.0, 5.0)];
        let data = first_collision(&world, &circle(0.0, 0.0, 1.0), Vec2::new(50.0, 0.0), &params());
        assert!(!data.is_hit());
        assert_eq!(data.position, Vec2::new(50.0, 0.0));
    }

    #[test]
    fn test_empty_world() {
        let world: Vec<Aabb> = Vec::new();
        let data = first_collision(&world, &circle(0.0, 0.0, 1.0), Vec2::new(5.0, 5.0), &params());
        assert_eq!(data, CollisionData::clear(Vec2::ZERO, Vec2::new(5.0, 5.0)));
    }

    #[test]
    fn test_earliest_of_several() {
        let mut world = StaticWorld::new();
        let far = world.insert(aabb(200.0, 0.0, 10.0, 50.0));
        let near = world.insert(aabb(60.0, 0.0, 10.0, 50.0));
        let data = first_collision(&world, &circle(0.0, 0.0, 5.0), Vec2::new(400.0, 0.0), &params());
        assert_eq!(data.obstacle, Some(near));
        assert_ne!(data.obstacle, Some(far));
        assert!((data.position.x - 45.0).abs() < 0.02);
    }

    #[test]
    fn test_broad_phase_culls_distant_boxes() {
        let world = vec![
            aabb(20.0, 0.0, 5.0, 5.0),
            aabb(500.0, 500.0, 5.0, 5.0),
            aabb(-300.0, 0.0, 5.0, 5.0),
        ];
        let bounds = broad_phase_bounds(&circle(0.0, 0.0, 2.0), Vec2::new(30.0, 0.0), 1.0);
        let ids: Vec<_> = broad_phase(&world, bounds).map(|(id, _)| id.index()).collect();
        assert_eq!(ids, vec![0]);
    }

    #[test]
    fn test_broad_phase_bounds_cover_move() {
        let bounds = broad_phase_bounds(&circle(0.0, 0.0, 2.0), Vec2::new(-10.0, 4.0), 1.0);
        assert_eq!(bounds.center(), Vec2::new(-5.0, 2.0));
        assert_eq!(bounds.half_extents(), Vec2::new(8.0, 5.0));
    }

    #[test]
    fn test_broad_phase_bounds_zero_radius_zero_pad() {
        let bounds = broad_phase_bounds(&circle(0.0, 0.0, 0.0), Vec2::new(10.0, 0.0), 0.0);
        assert!(bounds.half_extents().y > 0.0);
    }

    #[test]
    fn test_leaving_a_touched_corner_is_free() {
        let world = vec![aabb(100.0, 100.0, 20.0, 20.0)];
        let touching = circle(74.0, 72.0, 10.0);
        let data = first_collision(&world, &touching, Vec2::new(-60.0, -80.0), &params());
        assert!(!data.is_hit());
        assert_eq!(data.t, 1.0);
        assert_eq!(data.position, Vec2::new(14.0, -8.0));
    }

    #[test]
    fn test_corner_graze_reports_entered_face() {
        let world = vec![aabb(100.0, 29.0, 20.0, 20.0)];
        let data = first_collision(&world, &circle(0.0, 0.0, 10.0), Vec2::new(200.0, 0.0), &params());
        assert_eq!(data.direction, Direction::Left);
        assert!(data.t < 1.0);
    }

    #[test]
    fn test_thin_wall_fast_move() {
        let world = vec![aabb(500.0, 0.0, 0.25, 40.0)];
        let data =
            first_collision(&world, &circle(0.0, 0.0, 2.0), Vec2::new(5_000.0, 0.0), &params());
        assert_eq!(data.direction, Direction::Left);
        assert!(data.position.x < 500.0);
    }

    proptest! {
        #[test]
        fn prop_zero_displacement_is_identity(
            x in -200.0f32..200.0,
            y in -200.0f32..200.0,
            radius in 0.0f32..15.0,
        ) {
            let world = vec![aabb(0.0, 0.0, 30.0, 10.0), aabb(80.0, 80.0, 10.0, 30.0)];
            let c = circle(x, y, radius);
            prop_assume!(world.iter().all(|b| !circle_overlaps_aabb(&c, b)));
            let data = first_collision(&world, &c, Vec2::ZERO, &params());
            prop_assert_eq!(data.direction, Direction::None);
            prop_assert_eq!(data.t, 1.0);
            prop_assert_eq!(data.position, c.center());
        }

        #[test]
        fn prop_query_result_never_overlaps(
            x in -200.0f32..200.0,
            y in -200.0f32..200.0,
            dx in -400.0f32..400.0,
            dy in -400.0f32..400.0,
            radius in 0.5f32..15.0,
        ) {
            let world = vec![
                aabb(0.0, 0.0, 30.0, 10.0),
                aabb(80.0, 80.0, 10.0, 30.0),
                aabb(-90.0, 40.0, 25.0, 25.0),
            ];
            let c = circle(x, y, radius);
            prop_assume!(world.iter().all(|b| !circle_overlaps_aabb(&c, b)));
            let data = first_collision(&world, &c, Vec2::new(dx, dy), &params());
            prop_assert!((0.0..=1.0).contains(&data.t));
            let end = c.with_center(data.position);
            prop_assert!(world.iter().all(|b| !circle_overlaps_aabb(&end, b)));
        }
    }
}
