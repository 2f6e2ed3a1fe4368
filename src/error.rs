//! Error types for body construction and simulation.

use thiserror::Error;

/// Errors that can occur while building or driving a body.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PhysicsError {
    /// Construction input does not describe a valid body. Unrecoverable.
    #[error("invalid topology: {0}")]
    InvalidTopology(#[from] TopologyError),
    /// An operation needed at least one point but the body (or world) has none.
    #[error("body has no points")]
    EmptyBody,
    /// Enclosed area fell below the configured minimum and was clamped.
    ///
    /// Recoverable: the pressure pass continues with the clamped area.
    #[error("degenerate geometry: area {area:.3e} clamped to {clamped_to:.3e}")]
    DegenerateGeometry { area: f64, clamped_to: f64 },
}

/// Why a body description was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TopologyError {
    /// A polygon needs at least 3 points.
    #[error("body needs at least 3 points, got {count}")]
    InsufficientPoints { count: usize },
    /// Spring endpoint index is out of range.
    #[error("spring {spring} references point {index} (count: {count})")]
    SpringOutOfBounds { spring: usize, index: usize, count: usize },
    /// Spring connects a point to itself.
    #[error("spring {spring} connects point {index} to itself")]
    SelfSpring { spring: usize, index: usize },
    /// Mass must be positive and finite.
    #[error("mass must be positive and finite")]
    InvalidMass,
    /// Generated shapes need a positive, finite radius.
    #[error("radius must be positive and finite")]
    InvalidRadius,
    /// A pressurized body must enclose a non-zero area at rest.
    #[error("pressurized body encloses no area at rest")]
    DegenerateRestArea,
}

/// Convenience alias for `Result<T, PhysicsError>`.
pub type Result<T> = core::result::Result<T, PhysicsError>;
