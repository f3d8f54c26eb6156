//! Scenario files.
//!
//! A scenario is a TOML document describing collision params, gravity, the
//! static obstacles of a level and the bodies moving through it.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use glam::Vec2;
use ricochet_collision::{Aabb, Circle, CollisionParams};
use ricochet_common::ConfigError;
use serde::{Deserialize, Serialize};
use tracing::info;

/// What kind of actor a body is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyKind {
    /// Bounces off everything with its own rebound coefficient
    Ball,
    /// Slides normally, bounces while in hitstun
    Player,
}

/// One moving body in a scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodySpec {
    /// Name used in logs and the summary
    pub name: String,
    /// Actor kind
    pub kind: BodyKind,
    /// Collision volume and start position
    pub circle: Circle,
    /// Initial velocity in units per second
    #[serde(default)]
    pub velocity: Vec2,
    /// Rebound coefficient for balls
    #[serde(default = "default_rebound")]
    pub rebound: f32,
    /// Frames a player spends in hitstun from the start
    #[serde(default)]
    pub hitstun_frames: u32,
}

fn default_rebound() -> f32 {
    1.0
}

/// A complete scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    /// Frames to simulate
    pub frames: u32,
    /// Seconds per frame
    pub dt: f32,
    /// Acceleration applied to every body
    pub gravity: Vec2,
    /// Collision tunables
    pub params: CollisionParams,
    /// Static level geometry
    pub obstacles: Vec<Aabb>,
    /// Moving bodies
    pub bodies: Vec<BodySpec>,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            frames: 120,
            dt: 1.0 / 60.0,
            gravity: Vec2::new(0.0, 980.0),
            params: CollisionParams::default(),
            obstacles: Vec::new(),
            bodies: Vec::new(),
        }
    }
}

impl Scenario {
    /// Parses and validates a scenario.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let mut scenario: Self =
            toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        scenario.params.validate();
        scenario.validate()?;
        Ok(scenario)
    }

    /// Reads a scenario file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario {}", path.display()))?;
        let scenario = Self::from_toml_str(&contents)
            .with_context(|| format!("Invalid scenario {}", path.display()))?;

        info!(
            "Loaded scenario {}: {} obstacles, {} bodies",
            path.display(),
            scenario.obstacles.len(),
            scenario.bodies.len()
        );
        Ok(scenario)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "dt",
                reason: format!("must be positive, got {}", self.dt),
            });
        }
        if !self.gravity.is_finite() {
            return Err(ConfigError::InvalidValue {
                field: "gravity",
                reason: "must be finite".to_string(),
            });
        }
        if let Some(body) = self.bodies.iter().find(|b| !b.velocity.is_finite()) {
            return Err(ConfigError::InvalidValue {
                field: "velocity",
                reason: format!("body {} has a non-finite velocity", body.name),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: &str = r#"
frames = 30
gravity = [0.0, 500.0]

[params]
max_bounce_iterations = 8

[[obstacles]]
center = [0.0, 100.0]
half_extents = [200.0, 10.0]

[[bodies]]
name = "ball"
kind = "ball"
circle = { center = [0.0, 0.0], radius = 4.0 }
velocity = [30.0, 0.0]
rebound = 0.8

[[bodies]]
name = "hero"
kind = "player"
circle = { center = [50.0, 0.0], radius = 6.0 }
hitstun_frames = 10
"#;

    #[test]
    fn test_parse_scenario() {
        let scenario = Scenario::from_toml_str(SCENARIO).expect("parses");
        assert_eq!(scenario.frames, 30);
        assert_eq!(scenario.dt, 1.0 / 60.0);
        assert_eq!(scenario.gravity, Vec2::new(0.0, 500.0));
        assert_eq!(scenario.params.max_bounce_iterations, 8);
        assert_eq!(scenario.obstacles.len(), 1);
        assert_eq!(scenario.bodies.len(), 2);

        let hero = &scenario.bodies[1];
        assert_eq!(hero.kind, BodyKind::Player);
        assert_eq!(hero.velocity, Vec2::ZERO);
        assert_eq!(hero.rebound, 1.0);
        assert_eq!(hero.hitstun_frames, 10);
    }

    #[test]
    fn test_degenerate_obstacle_rejected() {
        let text = r#"
[[obstacles]]
center = [0.0, 0.0]
half_extents = [0.0, 10.0]
"#;
        assert!(matches!(Scenario::from_toml_str(text), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_bad_dt_rejected() {
        let result = Scenario::from_toml_str("dt = 0.0");
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { field: "dt", .. })
        ));
    }

    #[test]
    fn test_load_reports_path() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("missing.toml");
        let err = Scenario::load(&path).expect_err("missing file");
        assert!(format!("{err:#}").contains("missing.toml"));

        let good = dir.path().join("scenario.toml");
        fs::write(&good, SCENARIO).expect("writes");
        assert_eq!(Scenario::load(&good).expect("loads").bodies.len(), 2);
    }
}
