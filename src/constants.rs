//! Constants used throughout the library

/// Fallback for `intersection.parallel_epsilon`: smallest `|dot(direction, normal)|`
/// treated as a real crossing
pub const DEFAULT_PARALLEL_EPSILON: f64 = 1e-6;

/// Fallback for `intersection.behind_epsilon`: hits with `t < -epsilon` lie behind the eye
pub const DEFAULT_BEHIND_EPSILON: f64 = 1e-9;

/// Fallback for `tracking.grace_period_frames` (about 170 ms at 30 FPS)
pub const DEFAULT_GRACE_PERIOD_FRAMES: u32 = 5;

/// Degeneracy threshold for `|det(R)| / s^3`, with `s` the RMS magnitude of `R`
pub const DEGENERATE_DETERMINANT_EPSILON: f64 = 1e-9;

/// Vectors shorter than this are considered zero-length
pub const MIN_VECTOR_NORM: f64 = 1e-9;

/// Maximum `|cos|` between the normalized screen axes
pub const ORTHOGONALITY_TOLERANCE: f64 = 1e-6;

/// Allowed deviation of a 4x4 transform's bottom row from `(0, 0, 0, 1)`
pub const AFFINE_ROW_TOLERANCE: f64 = 1e-4;

/// Number of values in a column-major 4x4 transform
pub const TRANSFORM_MATRIX_LEN: usize = 16;

/// Default smoothing parameters
pub const DEFAULT_EXPONENTIAL_ALPHA: f64 = 0.5;
pub const DEFAULT_MOVING_AVERAGE_WINDOW: usize = 5;
pub const DEFAULT_KALMAN_PROCESS_NOISE: f64 = 0.1;
pub const DEFAULT_KALMAN_MEASUREMENT_NOISE: f64 = 1e-3;

/// Frame interval assumed by the Kalman filter
pub const DEFAULT_FPS: f64 = 30.0;

/// MacBook Pro 14" active display area, centimeters
pub const MBP14_SCREEN_WIDTH_CM: f64 = 30.25;
pub const MBP14_SCREEN_HEIGHT_CM: f64 = 19.65;

/// Distance from the MacBook Pro 14" display center up to the camera, centimeters
pub const MBP14_CAMERA_ABOVE_CENTER_CM: f64 = 10.4;
