//! Fixed-step simulation of a scenario.

use glam::Vec2;
use ricochet_collision::prelude::*;
use ricochet_common::{BodyId, ObstacleId};
use serde::Serialize;
use tracing::{debug, info, trace};

use crate::scenario::{BodyKind, BodySpec, Scenario};

/// A body being simulated.
#[derive(Debug, Clone)]
pub struct Body {
    /// Unique handle
    pub id: BodyId,
    /// Name from the scenario
    pub name: String,
    /// Actor kind
    pub kind: BodyKind,
    /// Current collision volume
    pub circle: Circle,
    /// Current velocity
    pub velocity: Vec2,
    /// Rebound coefficient (balls only)
    pub rebound: f32,
    /// Collision-relevant state (players only)
    pub state: ActorState,
    /// Resting on a floor after the last step (players only)
    pub grounded: bool,
    /// Frames of hitstun left
    pub hitstun_frames: u32,
    /// Faces struck so far
    pub contacts: u32,
    /// Last obstacle struck
    pub last_obstacle: Option<ObstacleId>,
    /// Moves that hit an iteration cap
    pub anomalies: u32,
}

impl Body {
    fn from_spec(spec: &BodySpec) -> Self {
        let state = if spec.hitstun_frames > 0 {
            ActorState::Hitstun
        } else {
            ActorState::Falling
        };
        Self {
            id: BodyId::allocate(),
            name: spec.name.clone(),
            kind: spec.kind,
            circle: spec.circle,
            velocity: spec.velocity,
            rebound: spec.rebound,
            state,
            grounded: false,
            hitstun_frames: spec.hitstun_frames,
            contacts: 0,
            last_obstacle: None,
            anomalies: 0,
        }
    }

    fn record(
        &mut self,
        position: Vec2,
        velocity: Vec2,
        obstacle: Option<ObstacleId>,
        resolution: Resolution,
    ) {
        self.circle = self.circle.with_center(position);
        self.velocity = velocity;
        if obstacle.is_some() {
            self.contacts += 1;
            self.last_obstacle = obstacle;
        }
        if !resolution.is_resolved() {
            self.anomalies += 1;
        }
    }
}

/// Final state of one body.
#[derive(Debug, Clone, Serialize)]
pub struct BodySummary {
    /// Raw body handle
    pub id: u64,
    /// Body name
    pub name: String,
    /// Actor kind
    pub kind: BodyKind,
    /// Final position
    pub position: Vec2,
    /// Final velocity
    pub velocity: Vec2,
    /// Final actor state
    pub state: ActorState,
    /// Whether the body ended on a floor
    pub grounded: bool,
    /// Frames in which something was struck
    pub contacts: u32,
    /// Last obstacle struck
    pub last_obstacle: Option<ObstacleId>,
    /// Moves that hit an iteration cap
    pub anomalies: u32,
}

/// Result of a whole run.
#[derive(Debug, Clone, Serialize)]
pub struct SimSummary {
    /// Frames simulated
    pub frames: u32,
    /// Seconds per frame
    pub dt: f32,
    /// Every body's final state
    pub bodies: Vec<BodySummary>,
}

/// A world of static obstacles and the bodies moving through it.
pub struct Simulation {
    world: StaticWorld,
    bodies: Vec<Body>,
    params: CollisionParams,
    gravity: Vec2,
    frame: u32,
}

impl Simulation {
    /// Builds a simulation from a scenario.
    #[must_use]
    pub fn new(scenario: &Scenario) -> Self {
        Self {
            world: StaticWorld::from_boxes(scenario.obstacles.iter().copied()),
            bodies: scenario.bodies.iter().map(Body::from_spec).collect(),
            params: scenario.params.clone(),
            gravity: scenario.gravity,
            frame: 0,
        }
    }

    /// Bodies in scenario order.
    #[must_use]
    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    /// Frames stepped so far.
    #[must_use]
    pub fn frame(&self) -> u32 {
        self.frame
    }

    /// The static obstacles.
    #[must_use]
    pub fn world(&self) -> &StaticWorld {
        &self.world
    }

    /// Advances every body by `dt` seconds.
    pub fn step(&mut self, dt: f32) {
        for body in &mut self.bodies {
            body.velocity += self.gravity * dt;
            match body.kind {
                BodyKind::Ball => step_ball(&self.world, body, dt, &self.params),
                BodyKind::Player => step_player(&self.world, body, dt, &self.params),
            }
            trace!(
                "frame {} {}: ({:.2}, {:.2}) v=({:.2}, {:.2}) {:?}",
                self.frame,
                body.name,
                body.circle.center().x,
                body.circle.center().y,
                body.velocity.x,
                body.velocity.y,
                body.state
            );
        }
        self.frame += 1;
    }

    /// Steps `frames` times and summarizes the result.
    pub fn run(&mut self, frames: u32, dt: f32) -> SimSummary {
        info!("Simulating {} bodies for {} frames", self.bodies.len(), frames);
        for _ in 0..frames {
            self.step(dt);
        }
        self.summary(dt)
    }

    /// Current state of every body.
    #[must_use]
    pub fn summary(&self, dt: f32) -> SimSummary {
        SimSummary {
            frames: self.frame,
            dt,
            bodies: self
                .bodies
                .iter()
                .map(|body| BodySummary {
                    id: body.id.raw(),
                    name: body.name.clone(),
                    kind: body.kind,
                    position: body.circle.center(),
                    velocity: body.velocity,
                    state: body.state,
                    grounded: body.grounded,
                    contacts: body.contacts,
                    last_obstacle: body.last_obstacle,
                    anomalies: body.anomalies,
                })
                .collect(),
        }
    }
}

fn step_ball(world: &StaticWorld, body: &mut Body, dt: f32, params: &CollisionParams) {
    let result = ballistic_move(world, &body.circle, body.velocity, dt, body.rebound, params);
    if result.direction.is_hit() {
        debug!("{} bounced off {:?} face", body.name, result.direction);
    }
    body.record(result.position, result.velocity, result.obstacle, result.resolution);
}

fn step_player(world: &StaticWorld, body: &mut Body, dt: f32, params: &CollisionParams) {
    let result = resolve_movement(world, &body.circle, body.velocity, dt, body.state, params);
    body.record(result.position, result.velocity, result.obstacle, result.resolution);
    body.grounded = result.grounded;

    if body.state.is_hitstun() {
        body.hitstun_frames = body.hitstun_frames.saturating_sub(1);
        if body.hitstun_frames > 0 {
            return;
        }
        debug!("{} recovered from hitstun", body.name);
        body.state = ActorState::Falling;
    }

    let grounded = result.grounded || probe_ground(world, &body.circle, params).is_some();
    body.grounded = grounded;
    let state = body.state.settle(grounded);
    if state != body.state {
        debug!("{} is now {:?}", body.name, state);
        body.state = state;
    }
}
