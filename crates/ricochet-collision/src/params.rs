//! Collision tunables.
//!
//! Every query takes a [`CollisionParams`] explicitly; there is no global
//! configuration. Params can be loaded from and saved to a TOML file.

use std::fs;
use std::path::Path;

use ricochet_common::{ConfigError, RicochetResult};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Collision and resolution parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionParams {
    // === Contact Margins ===
    /// Absolute distance a struck circle is pushed off the face
    pub skin_width: f32,
    /// Extra push as a fraction of the circle radius
    pub skin_radius_fraction: f32,
    /// Padding added to the broad-phase culling box
    pub broad_phase_pad: f32,

    // === Iteration Caps ===
    /// Maximum bounces resolved per ballistic move
    pub max_bounce_iterations: u32,
    /// Maximum bounces resolved per hitstun move
    pub max_hitstun_iterations: u32,

    // === Hitstun ===
    /// Fraction of speed kept by the reflected axis during hitstun
    pub hitstun_rebound: f32,
    /// Scale applied to the accumulated hitstun displacement
    pub hitstun_shrink: f32,

    // === Grounding ===
    /// How far below an actor the ground probe looks
    pub ground_probe_distance: f32,

    // === Debug ===
    /// Verify non-penetration after every resolution and log violations
    pub check_invariants: bool,
}

impl Default for CollisionParams {
    fn default() -> Self {
        Self {
            skin_width: 0.01,
            skin_radius_fraction: 0.0,
            broad_phase_pad: 1.0,

            max_bounce_iterations: 5,
            max_hitstun_iterations: 5,

            hitstun_rebound: 1.0,
            hitstun_shrink: 0.95,

            ground_probe_distance: 1.0,

            check_invariants: cfg!(debug_assertions),
        }
    }
}

impl CollisionParams {
    /// Creates params with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the absolute skin width.
    #[must_use]
    pub fn with_skin_width(mut self, skin_width: f32) -> Self {
        self.skin_width = skin_width;
        self
    }

    /// Sets the ballistic iteration cap.
    #[must_use]
    pub fn with_max_bounce_iterations(mut self, iterations: u32) -> Self {
        self.max_bounce_iterations = iterations;
        self
    }

    /// Sets the hitstun iteration cap.
    #[must_use]
    pub fn with_max_hitstun_iterations(mut self, iterations: u32) -> Self {
        self.max_hitstun_iterations = iterations;
        self
    }

    /// Enables or disables the non-penetration audit.
    #[must_use]
    pub fn with_invariant_checks(mut self, enabled: bool) -> Self {
        self.check_invariants = enabled;
        self
    }

    /// Effective skin for a circle of the given radius.
    #[must_use]
    pub fn skin_for(&self, radius: f32) -> f32 {
        self.skin_width + radius * self.skin_radius_fraction
    }

    /// Validate and clamp values to sensible ranges.
    pub fn validate(&mut self) {
        self.skin_width = self.skin_width.clamp(0.0, 10.0);
        self.skin_radius_fraction = self.skin_radius_fraction.clamp(0.0, 0.5);
        self.broad_phase_pad = self.broad_phase_pad.clamp(0.0, 100.0);

        self.max_bounce_iterations = self.max_bounce_iterations.clamp(1, 64);
        self.max_hitstun_iterations = self.max_hitstun_iterations.clamp(1, 64);

        self.hitstun_rebound = self.hitstun_rebound.clamp(0.0, 1.0);
        self.hitstun_shrink = self.hitstun_shrink.clamp(0.0, 1.0);

        self.ground_probe_distance = self.ground_probe_distance.clamp(0.0, 100.0);
    }

    /// Parses params from TOML text. Missing fields take their defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let mut params: Self =
            toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        params.validate();
        Ok(params)
    }

    /// Serializes params to TOML text.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Load params from a file.
    /// Returns defaults if the file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Collision params not found at {}, using defaults", path.display());
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(contents) => match Self::from_toml_str(&contents) {
                Ok(params) => {
                    info!("Loaded collision params from {}", path.display());
                    params
                },
                Err(e) => {
                    warn!("Failed to parse collision params: {e}");
                    Self::default()
                },
            },
            Err(e) => {
                warn!("Failed to read collision params: {e}");
                Self::default()
            },
        }
    }

    /// Save params to a file, creating parent directories as needed.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> RicochetResult<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = self.to_toml_string()?;
        fs::write(path, contents)?;

        info!("Saved collision params to {}", path.display());
        Ok(())
    }
}
