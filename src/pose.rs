//! Frame transform extraction.
//!
//! Normalizes whatever the landmark source yields for one video frame into a
//! canonical [`HeadPose`] in the camera frame. Structural problems with the
//! input (wrong shape, non-finite translation, non-affine transform) are
//! reported as [`FrameError::NoDetection`]; numeric validity of the rotation is
//! left to the ray builder.

use crate::{
    constants::{AFFINE_ROW_TOLERANCE, TRANSFORM_MATRIX_LEN},
    error::FrameError,
};
use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

/// Per-frame output of the landmark source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FrameInput {
    /// No face in this frame
    NoFace,
    /// Explicit position and row-major rotation
    Pose {
        position: [f64; 3],
        rotation: [[f64; 3]; 3],
    },
    /// Column-major 4x4 face transform, as emitted by MediaPipe's face landmarker
    Matrix { values: Vec<f64> },
}

impl FrameInput {
    /// Wrap a raw single-precision column-major transform
    pub fn from_column_major(values: &[f32]) -> Self {
        Self::Matrix {
            values: values.iter().map(|&v| f64::from(v)).collect(),
        }
    }

    /// Build a pose input from nalgebra types
    pub fn from_pose(position: Vector3<f64>, rotation: &Matrix3<f64>) -> Self {
        let row = |r: usize| [rotation[(r, 0)], rotation[(r, 1)], rotation[(r, 2)]];
        Self::Pose {
            position: position.into(),
            rotation: [row(0), row(1), row(2)],
        }
    }
}

/// Head position and orientation in the camera frame, valid for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadPose {
    pub position: Vector3<f64>,
    pub rotation: Matrix3<f64>,
}

impl HeadPose {
    pub const fn new(position: Vector3<f64>, rotation: Matrix3<f64>) -> Self {
        Self { position, rotation }
    }

    /// Head at `position` facing straight along its local axes
    pub fn facing_forward(position: Vector3<f64>) -> Self {
        Self::new(position, Matrix3::identity())
    }
}

/// Extract the head pose carried by a frame.
///
/// # Errors
///
/// Returns [`FrameError::NoDetection`] when the frame holds no face or its
/// transform is malformed.
pub fn extract_head_pose(input: &FrameInput) -> Result<HeadPose, FrameError> {
    match input {
        FrameInput::NoFace => Err(FrameError::NoDetection),
        FrameInput::Pose { position, rotation } => {
            let position = Vector3::from(*position);
            if !is_finite(&position) {
                return Err(FrameError::NoDetection);
            }
            let rotation = Matrix3::from_fn(|r, c| rotation[r][c]);
            Ok(HeadPose::new(position, rotation))
        }
        FrameInput::Matrix { values } => pose_from_column_major(values),
    }
}

fn pose_from_column_major(values: &[f64]) -> Result<HeadPose, FrameError> {
    if values.len() != TRANSFORM_MATRIX_LEN {
        log::trace!("Rejecting transform with {} values", values.len());
        return Err(FrameError::NoDetection);
    }

    let at = |row: usize, col: usize| values[col * 4 + row];

    // Projective transforms carry no rigid head pose.
    let bottom_row = [at(3, 0), at(3, 1), at(3, 2), at(3, 3)];
    let expected = [0.0, 0.0, 0.0, 1.0];
    let affine = bottom_row
        .iter()
        .zip(expected)
        .all(|(&got, want)| got.is_finite() && (got - want).abs() <= AFFINE_ROW_TOLERANCE);
    if !affine {
        return Err(FrameError::NoDetection);
    }

    let position = Vector3::new(at(0, 3), at(1, 3), at(2, 3));
    if !is_finite(&position) {
        return Err(FrameError::NoDetection);
    }

    let rotation = Matrix3::from_fn(at);
    Ok(HeadPose::new(position, rotation))
}

fn is_finite(v: &Vector3<f64>) -> bool {
    v.iter().all(|c| c.is_finite())
}
