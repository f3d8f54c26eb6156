//! Shared pieces of the iterative resolvers.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::shapes::{Axis, Direction};

/// A resolver ran out of iterations before the move settled.
///
/// The accompanying result holds the position reached after the last
/// completed iteration.
#[derive(Debug, Clone, Copy, PartialEq, Error, Serialize, Deserialize)]
#[error("collision unresolved after {iterations} iterations ({remaining_time:.4}s of motion left)")]
pub struct UnresolvedCollision {
    /// Iterations performed
    pub iterations: u32,
    /// Time budget that was still unspent
    pub remaining_time: f32,
}

/// Whether a resolver settled the move.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum Resolution {
    /// The move completed or stopped cleanly
    #[default]
    Resolved,
    /// The iteration cap was hit; the result is the best partial answer
    Partial {
        /// Why resolution stopped early
        reason: UnresolvedCollision,
    },
}

impl Resolution {
    /// Checks if the move settled.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        matches!(self, Resolution::Resolved)
    }

    /// The anomaly, if any.
    #[must_use]
    pub fn reason(&self) -> Option<&UnresolvedCollision> {
        match self {
            Resolution::Resolved => None,
            Resolution::Partial { reason } => Some(reason),
        }
    }

    /// Converts to a `Result` for callers that treat partial moves as errors.
    pub fn into_result(self) -> Result<(), UnresolvedCollision> {
        match self {
            Resolution::Resolved => Ok(()),
            Resolution::Partial { reason } => Err(reason),
        }
    }
}

/// Reflects the velocity component on the struck face's axis, keeping
/// `rebound` of its magnitude.
#[must_use]
pub fn reflect(velocity: Vec2, direction: Direction, rebound: f32) -> Vec2 {
    match direction.axis() {
        Some(Axis::X) => Vec2::new(-velocity.x * rebound, velocity.y),
        Some(Axis::Y) => Vec2::new(velocity.x, -velocity.y * rebound),
        None => velocity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reflect_horizontal() {
        let v = reflect(Vec2::new(10.0, 3.0), Direction::Left, 0.5);
        assert_eq!(v, Vec2::new(-5.0, 3.0));
    }

    #[test]
    fn test_reflect_vertical() {
        let v = reflect(Vec2::new(10.0, 3.0), Direction::Up, 1.0);
        assert_eq!(v, Vec2::new(10.0, -3.0));
    }

    #[test]
    fn test_reflect_inelastic_zeroes_axis() {
        let v = reflect(Vec2::new(10.0, 3.0), Direction::Down, 0.0);
        assert_eq!(v.y.abs(), 0.0);
        assert_eq!(v.x, 10.0);
    }

    #[test]
    fn test_reflect_none_is_identity() {
        assert_eq!(reflect(Vec2::ONE, Direction::None, 0.0), Vec2::ONE);
    }

    #[test]
    fn test_resolution_into_result() {
        assert!(Resolution::Resolved.into_result().is_ok());

        let reason = UnresolvedCollision {
            iterations: 5,
            remaining_time: 0.25,
        };
        let partial = Resolution::Partial { reason };
        assert!(!partial.is_resolved());
        assert_eq!(partial.reason(), Some(&reason));
        assert_eq!(partial.into_result(), Err(reason));
        assert_eq!(
            reason.to_string(),
            "collision unresolved after 5 iterations (0.2500s of motion left)"
        );
    }
}
