//! Error types for the persistence viewer.
//!
//! Only data-integrity problems are errors. Cosmetic interactive parameters
//! (radius, selection) are clamped instead of raised.

use thiserror::Error;

/// Errors raised while building a point cloud from a source.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CloudError {
    /// The uploaded table could not be interpreted as a point cloud.
    #[error("Malformed input at line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    /// Points are neither 2D nor 3D.
    #[error("Unsupported dimension: {0} (only 2D and 3D point clouds are supported)")]
    UnsupportedDimension(usize),

    /// A cloud needs at least one point.
    #[error("Point cloud is empty")]
    Empty,

    /// The name does not match any built-in dataset.
    #[error("Unknown dataset: {0}")]
    UnknownDataset(String),
}

impl CloudError {
    /// Creates a malformed-input error for a 1-based line number.
    pub fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Self::Malformed {
            line,
            reason: reason.into(),
        }
    }

    /// True for errors that reject user-supplied data.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed { .. } | Self::Empty)
    }
}

/// Errors raised by the persistence computation boundary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ComputationError {
    #[error("Cannot compute persistence of an empty point cloud")]
    EmptyCloud,

    #[error("Invalid filtration radius: {0}")]
    InvalidRadius(f64),

    #[error("Invalid distance threshold: {0}")]
    InvalidThreshold(f64),

    #[error("Point {index} has a non-finite coordinate")]
    NonFiniteCoordinate { index: usize },

    #[error("Persistence backend failed: {0}")]
    Backend(String),
}

impl ComputationError {
    /// Creates a backend failure.
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}

/// Errors raised while loading or validating a [`crate::ViewerConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }
}
