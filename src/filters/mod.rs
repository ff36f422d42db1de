//! Smoothing filters for normalized gaze coordinates.
//!
//! Raw gaze points jitter with every small landmark error. A filter runs on
//! the normalized `(x, y)` of each valid point before it reaches the tracker.

/// Kalman filter with a constant-velocity model
pub mod kalman;

/// Moving average filter for simple smoothing
pub mod moving_average;

/// Exponential filter for responsive smoothing
pub mod exponential;

use crate::{config::FilterConfig, Error, Result};

/// Trait for all gaze point filters
pub trait GazeFilter: Send + Sync {
    /// Apply filter to normalized screen coordinates
    fn apply(&mut self, x: f64, y: f64) -> (f64, f64);

    /// Reset filter state
    fn reset(&mut self);

    /// Get filter name
    fn name(&self) -> &str;
}

/// No-op filter that passes through values unchanged
pub struct NoFilter;

impl GazeFilter for NoFilter {
    fn apply(&mut self, x: f64, y: f64) -> (f64, f64) {
        (x, y)
    }

    fn reset(&mut self) {}

    fn name(&self) -> &str {
        "NoFilter"
    }
}

/// Create a gaze filter from configuration
///
/// # Errors
///
/// Returns [`Error::FilterError`] for an unknown kind or out-of-range parameters.
pub fn create_filter(config: &FilterConfig) -> Result<Box<dyn GazeFilter>> {
    match config.kind.to_lowercase().as_str() {
        "none" | "nofilter" => Ok(Box::new(NoFilter)),
        "exponential" => {
            let alpha = config.exponential_alpha;
            if !(alpha > 0.0 && alpha <= 1.0) {
                return Err(Error::FilterError(format!("Alpha must be in (0, 1], got {alpha}")));
            }
            Ok(Box::new(exponential::ExponentialFilter::new(alpha)))
        }
        "moving_average" | "movingaverage" => {
            if config.moving_average_window == 0 {
                return Err(Error::FilterError("Window size must be greater than 0".to_string()));
            }
            Ok(Box::new(moving_average::MovingAverageFilter::new(config.moving_average_window)))
        }
        "kalman" => {
            let (q, r) = (config.kalman_process_noise, config.kalman_measurement_noise);
            if !(q.is_finite() && q > 0.0 && r.is_finite() && r > 0.0) {
                return Err(Error::FilterError(format!(
                    "Kalman noise terms must be positive, got q={q}, r={r}"
                )));
            }
            Ok(Box::new(kalman::KalmanFilter::new(q, r)))
        }
        other => Err(Error::FilterError(format!("Unknown filter type: {other}"))),
    }
}
