//! # Ricochet Collision
//!
//! Continuous collision detection and motion resolution for circles moving
//! through a world of static axis-aligned boxes.
//!
//! This crate provides:
//! - Geometric primitives (boxes, circles, segments, rays)
//! - Static overlap predicates
//! - Ray and segment intersection routines
//! - The swept circle versus box test with corner handling
//! - Broad-phase culling and the first-collision query
//! - Ballistic bounce resolution
//! - Player movement resolution (slide and hitstun bounce)
//! - Tunables loaded from TOML and optional consistency checks
//!
//! Every query is synchronous and reads the world as a snapshot; nothing
//! here mutates obstacle geometry.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod ballistic;
pub mod intersect;
pub mod movement;
pub mod overlap;
pub mod params;
pub mod query;
pub mod resolve;
pub mod shapes;
pub mod sweep;
pub mod verify;
pub mod world;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::ballistic::*;
    pub use crate::intersect::*;
    pub use crate::movement::*;
    pub use crate::overlap::*;
    pub use crate::params::*;
    pub use crate::query::*;
    pub use crate::resolve::*;
    pub use crate::shapes::*;
    pub use crate::sweep::*;
    pub use crate::verify::*;
    pub use crate::world::*;
    pub use glam::Vec2;
    pub use ricochet_common::{BodyId, ObstacleId};
}

pub use prelude::*;
