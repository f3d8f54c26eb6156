//! Error types for Ricochet.

use thiserror::Error;

/// Top-level error type for Ricochet operations.
#[derive(Debug, Error)]
pub enum RicochetError {
    /// Shape construction errors
    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shape kinds that can be rejected at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    /// Axis-aligned box
    Aabb,
    /// Circle
    Circle,
}

impl std::fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Aabb => "AABB",
            Self::Circle => "circle",
        };
        f.write_str(name)
    }
}

/// Invalid geometry handed to a shape constructor.
///
/// These are programmer errors: shapes are validated once when they are
/// built and never re-checked per query.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// Zero-area box, negative radius and similar
    #[error("degenerate {shape}: {reason}")]
    DegenerateGeometry {
        /// Shape that failed validation
        shape: ShapeKind,
        /// Why it was rejected
        reason: String,
    },

    /// NaN or infinite coordinates
    #[error("non-finite {shape} coordinates")]
    NonFinite {
        /// Shape that failed validation
        shape: ShapeKind,
    },
}

impl GeometryError {
    /// Shorthand for a [`GeometryError::DegenerateGeometry`].
    #[must_use]
    pub fn degenerate(shape: ShapeKind, reason: impl Into<String>) -> Self {
        Self::DegenerateGeometry {
            shape,
            reason: reason.into(),
        }
    }
}

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config text could not be parsed
    #[error("Failed to parse config: {0}")]
    Parse(String),

    /// Config could not be serialized
    #[error("Failed to serialize config: {0}")]
    Serialize(String),

    /// A value is outside its allowed range
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue {
        /// Offending field
        field: &'static str,
        /// Why it is invalid
        reason: String,
    },
}

/// Result type alias for Ricochet operations.
pub type RicochetResult<T> = Result<T, RicochetError>;
