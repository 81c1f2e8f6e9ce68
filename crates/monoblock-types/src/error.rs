//! Error handling for the monoblock pipeline.

use thiserror::Error;

/// Unified error type used across all monoblock crates.
#[derive(Error, Debug)]
pub enum MonoblockError {
    /// Configuration file could not be parsed or contains invalid values.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Geometry construction failed (non-positive or inconsistent dimensions).
    #[error("Geometry error: {0}")]
    GeometryError(String),

    /// A sampled or supplied physical quantity is outside its valid range.
    #[error("Physics violation: {0}")]
    PhysicsViolation(String),

    /// Requested tally does not exist in the statepoint.
    #[error("Tally not found: {name}")]
    TallyNotFound { name: String },

    /// Flat tally data does not match the mesh it is being reshaped onto.
    #[error("Shape mismatch: expected {expected} values, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// Post-processing failure (degenerate fit input, export error).
    #[error("Post-processing error: {0}")]
    PostProcessError(String),

    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Statepoint or configuration JSON failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout the workspace.
pub type MonoblockResult<T> = Result<T, MonoblockError>;
