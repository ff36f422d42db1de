//! Error types for the gaze estimation library.
//!
//! Two families live here. [`Error`] covers setup-time failures (configuration,
//! file I/O) that should stop the program before the first frame. [`FrameError`]
//! covers the expected per-frame misses that the tracker absorbs.

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML (de)serialization failed
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Invalid input parameters provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Filter initialization error
    #[error("Filter error: {0}")]
    FilterError(String),
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Why a gaze ray failed to hit the screen plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntersectionMiss {
    /// Ray runs parallel to the screen surface
    Parallel,
    /// Screen lies behind the ray origin
    Behind,
}

impl std::fmt::Display for IntersectionMiss {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parallel => f.write_str("ray parallel to screen plane"),
            Self::Behind => f.write_str("screen plane behind ray origin"),
        }
    }
}

/// Recoverable, per-frame reasons for not producing a gaze point
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FrameError {
    /// The landmark source found no face, or its output was malformed
    #[error("no face detected")]
    NoDetection,

    /// The detected pose is numerically unusable
    #[error("malformed head pose: {0}")]
    MalformedPose(String),

    /// The gaze ray never reaches the screen
    #[error("no intersection: {0}")]
    NoIntersection(IntersectionMiss),
}
