//! Player movement resolution.
//!
//! Actors outside knockback slide along whatever they hit: the blocked axis
//! is zeroed and the rest of the move is retried once on the free axis.
//! Actors in hitstun bounce like a ballistic body, landing ends the bounce,
//! and the total travel is shrunk slightly so the actor does not come to
//! rest exactly on a face.

use glam::Vec2;
use ricochet_common::ObstacleId;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::params::CollisionParams;
use crate::query::first_collision;
use crate::resolve::{Resolution, UnresolvedCollision};
use crate::shapes::{Circle, Direction};
use crate::verify::{audit, check_non_penetration};
use crate::world::ObstacleQuery;

/// Collision-relevant state of a player-like actor.
///
/// Entering and leaving [`ActorState::Hitstun`] is driven by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorState {
    /// On the ground
    #[default]
    Standing,
    /// Airborne
    Falling,
    /// Knocked back; movement bounces
    Hitstun,
}

impl ActorState {
    /// Resolution policy used in this state.
    #[must_use]
    pub fn policy(self) -> MovePolicy {
        match self {
            ActorState::Hitstun => MovePolicy::Bounce,
            ActorState::Standing | ActorState::Falling => MovePolicy::Slide,
        }
    }

    /// Whether the actor is knocked back.
    #[must_use]
    pub fn is_hitstun(self) -> bool {
        self == ActorState::Hitstun
    }

    /// Applies a ground probe result. Hitstun is left alone.
    #[must_use]
    pub fn settle(self, grounded: bool) -> Self {
        match self {
            ActorState::Hitstun => ActorState::Hitstun,
            _ if grounded => ActorState::Standing,
            _ => ActorState::Falling,
        }
    }
}

/// How a move reacts to contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovePolicy {
    /// Stop on the blocked axis and continue on the other
    Slide,
    /// Reflect off faces until the time step is spent
    Bounce,
}

/// Outcome of one movement resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovementResult {
    /// Final circle center
    pub position: Vec2,
    /// Velocity after resolution
    pub velocity: Vec2,
    /// Last face struck
    pub direction: Direction,
    /// Last obstacle struck
    pub obstacle: Option<ObstacleId>,
    /// A `Down` face was struck during the move
    pub grounded: bool,
    /// Whether the move settled within the iteration cap
    pub resolution: Resolution,
}

impl MovementResult {
    fn unobstructed(position: Vec2, velocity: Vec2) -> Self {
        Self {
            position,
            velocity,
            direction: Direction::None,
            obstacle: None,
            grounded: false,
            resolution: Resolution::Resolved,
        }
    }
}

/// Moves an actor for `dt` seconds using the policy of its `state`.
pub fn resolve_movement<W>(
    world: &W,
    circle: &Circle,
    velocity: Vec2,
    dt: f32,
    state: ActorState,
    params: &CollisionParams,
) -> MovementResult
where
    W: ObstacleQuery + ?Sized,
{
    match state.policy() {
        MovePolicy::Slide => slide_move(world, circle, velocity, dt, params),
        MovePolicy::Bounce => hitstun_move(world, circle, velocity, dt, params),
    }
}

/// Moves an actor, sliding along the first face struck.
///
/// A second contact while sliding means the actor is wedged into a corner
/// and its velocity is zeroed.
pub fn slide_move<W>(
    world: &W,
    circle: &Circle,
    velocity: Vec2,
    dt: f32,
    params: &CollisionParams,
) -> MovementResult
where
    W: ObstacleQuery + ?Sized,
{
    let start = circle.center();
    let motion = velocity * dt;

    let first = first_collision(world, circle, motion, params);
    if !first.is_hit() {
        return MovementResult::unobstructed(first.position, velocity);
    }

    let consumed = first.position - start;
    let mut velocity = velocity;
    let remainder = if first.direction.is_vertical() {
        velocity.y = 0.0;
        Vec2::new(motion.x - consumed.x, 0.0)
    } else {
        velocity.x = 0.0;
        Vec2::new(0.0, motion.y - consumed.y)
    };

    let body = circle.with_center(first.position);
    let second = first_collision(world, &body, remainder, params);

    let mut result = MovementResult {
        position: second.position,
        velocity,
        direction: first.direction,
        obstacle: first.obstacle,
        grounded: first.direction == Direction::Down,
        resolution: Resolution::Resolved,
    };

    if second.is_hit() {
        debug!(
            "wedged between {:?} and {:?} faces at ({:.2}, {:.2})",
            first.direction, second.direction, second.position.x, second.position.y
        );
        result.velocity = Vec2::ZERO;
        result.direction = second.direction;
        result.obstacle = second.obstacle;
        result.grounded |= second.direction == Direction::Down;
    } else {
        debug!("sliding along {:?} face", first.direction);
    }

    audit(world, &circle.with_center(result.position), params, "slide move");
    result
}

/// Moves a knocked-back actor, bouncing off walls and ceilings until it
/// lands or the time step is spent.
pub fn hitstun_move<W>(
    world: &W,
    circle: &Circle,
    velocity: Vec2,
    dt: f32,
    params: &CollisionParams,
) -> MovementResult
where
    W: ObstacleQuery + ?Sized,
{
    let start = circle.center();
    let mut body = *circle;
    let mut velocity = velocity;
    let mut remaining = dt;
    let mut travelled = Vec2::ZERO;
    let mut direction = Direction::None;
    let mut obstacle = None;
    let mut grounded = false;
    let mut settled = false;

    for iteration in 0..params.max_hitstun_iterations {
        let data = first_collision(world, &body, velocity * remaining, params);
        travelled += data.position - body.center();
        body = body.with_center(data.position);

        if !data.is_hit() {
            settled = true;
            break;
        }

        direction = data.direction;
        obstacle = data.obstacle;
        remaining *= 1.0 - data.t;

        match data.direction {
            Direction::Left | Direction::Right => {
                velocity.x = -velocity.x * params.hitstun_rebound;
            },
            Direction::Up => {
                velocity.y = -velocity.y * params.hitstun_rebound;
            },
            Direction::Down => {
                velocity.y = 0.0;
                grounded = true;
                settled = true;
                debug!("hitstun landed after {} bounces", iteration);
                break;
            },
            Direction::None => {
                settled = true;
                break;
            },
        }

        debug!(
            "hitstun bounce {} off {:?} face, velocity now ({:.2}, {:.2})",
            iteration + 1,
            data.direction,
            velocity.x,
            velocity.y
        );
    }

    let shrunk = body.with_center(start + travelled * params.hitstun_shrink);
    // The shrunk straight line can cut a corner the bounces went around.
    let end = if check_non_penetration(world, &shrunk).is_ok() {
        shrunk
    } else {
        body
    };

    let resolution = if settled {
        Resolution::Resolved
    } else {
        let reason = UnresolvedCollision {
            iterations: params.max_hitstun_iterations,
            remaining_time: remaining,
        };
        warn!("Hitstun move stopped early: {reason}");
        Resolution::Partial { reason }
    };

    audit(world, &end, params, "hitstun move");

    MovementResult {
        position: end.center(),
        velocity,
        direction,
        obstacle,
        grounded,
        resolution,
    }
}

/// Looks for ground directly beneath `circle`.
///
/// Returns the obstacle whose top face is within
/// [`CollisionParams::ground_probe_distance`].
pub fn probe_ground<W>(world: &W, circle: &Circle, params: &CollisionParams) -> Option<ObstacleId>
where
    W: ObstacleQuery + ?Sized,
{
    let probe = Vec2::new(0.0, params.ground_probe_distance);
    let data = first_collision(world, circle, probe, params);
    if data.direction == Direction::Down {
        data.obstacle
    } else {
        None
    }
}
