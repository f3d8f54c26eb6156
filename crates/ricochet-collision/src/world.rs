//! Read-only access to the static obstacles of a world.
//!
//! The core never owns level geometry. Anything that can list its boxes
//! with stable handles can be queried.

use ricochet_common::ObstacleId;
use serde::{Deserialize, Serialize};

use crate::shapes::Aabb;

/// Enumerates the static obstacles of a world for one frame.
///
/// Order is irrelevant; the collection is treated as a set.
pub trait ObstacleQuery {
    /// Iterates every obstacle with its handle.
    fn obstacles(&self) -> impl Iterator<Item = (ObstacleId, &Aabb)> + '_;

    /// Looks up an obstacle by handle.
    fn obstacle(&self, id: ObstacleId) -> Option<&Aabb>;
}

impl ObstacleQuery for [Aabb] {
    fn obstacles(&self) -> impl Iterator<Item = (ObstacleId, &Aabb)> + '_ {
        self.iter()
            .enumerate()
            .map(|(i, aabb)| (ObstacleId::from_index(i), aabb))
    }

    fn obstacle(&self, id: ObstacleId) -> Option<&Aabb> {
        self.get(id.index())
    }
}

impl ObstacleQuery for Vec<Aabb> {
    fn obstacles(&self) -> impl Iterator<Item = (ObstacleId, &Aabb)> + '_ {
        self.as_slice().obstacles()
    }

    fn obstacle(&self, id: ObstacleId) -> Option<&Aabb> {
        self.as_slice().obstacle(id)
    }
}

/// Obstacle collection with explicit, stable handles.
///
/// Handles stay valid when other obstacles are removed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaticWorld {
    obstacles: Vec<(ObstacleId, Aabb)>,
    next_id: u32,
}

impl StaticWorld {
    /// Creates an empty world.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a world from boxes, numbering them in order.
    #[must_use]
    pub fn from_boxes(boxes: impl IntoIterator<Item = Aabb>) -> Self {
        let mut world = Self::new();
        for aabb in boxes {
            world.insert(aabb);
        }
        world
    }

    /// Adds an obstacle and returns its handle.
    pub fn insert(&mut self, aabb: Aabb) -> ObstacleId {
        let id = ObstacleId::new(self.next_id);
        self.next_id += 1;
        self.obstacles.push((id, aabb));
        id
    }

    /// Removes an obstacle, returning it if it existed.
    pub fn remove(&mut self, id: ObstacleId) -> Option<Aabb> {
        let index = self.obstacles.iter().position(|(other, _)| *other == id)?;
        Some(self.obstacles.swap_remove(index).1)
    }

    /// Number of obstacles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    /// Checks if the world has no obstacles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    /// Removes every obstacle. Handles are not reused.
    pub fn clear(&mut self) {
        self.obstacles.clear();
    }
}

impl ObstacleQuery for StaticWorld {
    fn obstacles(&self) -> impl Iterator<Item = (ObstacleId, &Aabb)> + '_ {
        self.obstacles.iter().map(|(id, aabb)| (*id, aabb))
    }

    fn obstacle(&self, id: ObstacleId) -> Option<&Aabb> {
        self.obstacles
            .iter()
            .find(|(other, _)| *other == id)
            .map(|(_, aabb)| aabb)
    }
}
