use super::GazeFilter;
use crate::constants::DEFAULT_FPS;
use nalgebra::{Matrix2, Matrix4, SMatrix, Vector2, Vector4};

type Matrix2x4 = SMatrix<f64, 2, 4>;

/// Constant-velocity Kalman filter over normalized screen coordinates
pub struct KalmanFilter {
    // State: [x, y, vx, vy]
    state: Vector4<f64>,
    // State covariance
    covariance: Matrix4<f64>,
    // Process noise
    process_noise: Matrix4<f64>,
    // Measurement noise
    measurement_noise: Matrix2<f64>,
    // State transition matrix
    transition: Matrix4<f64>,
    // Measurement matrix
    measurement: Matrix2x4,
    initialized: bool,
}

impl KalmanFilter {
    /// Create a filter with process noise `q` and measurement noise `r`
    pub fn new(q: f64, r: f64) -> Self {
        let dt = 1.0 / DEFAULT_FPS;

        #[rustfmt::skip]
        let transition = Matrix4::new(
            1.0, 0.0, dt,  0.0,
            0.0, 1.0, 0.0, dt,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        );

        // We only measure position
        #[rustfmt::skip]
        let measurement = Matrix2x4::new(
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
        );

        // Discrete white-noise acceleration model
        let (dt2, dt3, dt4) = (dt.powi(2), dt.powi(3), dt.powi(4));
        #[rustfmt::skip]
        let process_noise = Matrix4::new(
            q * dt4 / 4.0, 0.0,           q * dt3 / 2.0, 0.0,
            0.0,           q * dt4 / 4.0, 0.0,           q * dt3 / 2.0,
            q * dt3 / 2.0, 0.0,           q * dt2,       0.0,
            0.0,           q * dt3 / 2.0, 0.0,           q * dt2,
        );

        Self {
            state: Vector4::zeros(),
            covariance: Matrix4::identity(),
            process_noise,
            measurement_noise: Matrix2::identity() * r,
            transition,
            measurement,
            initialized: false,
        }
    }

    fn predict(&mut self) {
        self.state = self.transition * self.state;
        self.covariance = self.transition * self.covariance * self.transition.transpose() + self.process_noise;
    }

    fn update(&mut self, measured: Vector2<f64>) {
        let innovation = measured - self.measurement * self.state;
        let innovation_cov = self.measurement * self.covariance * self.measurement.transpose() + self.measurement_noise;

        // Singular innovation covariance: keep the prediction
        let Some(inverse) = innovation_cov.try_inverse() else {
            return;
        };
        let gain = self.covariance * self.measurement.transpose() * inverse;

        self.state += gain * innovation;
        self.covariance = (Matrix4::identity() - gain * self.measurement) * self.covariance;
    }
}

impl GazeFilter for KalmanFilter {
    fn apply(&mut self, x: f64, y: f64) -> (f64, f64) {
        if !self.initialized {
            // Start at rest on the first measurement
            self.state = Vector4::new(x, y, 0.0, 0.0);
            self.covariance = Matrix4::identity();
            self.initialized = true;
            return (x, y);
        }

        self.predict();
        self.update(Vector2::new(x, y));
        (self.state[0], self.state[1])
    }

    fn reset(&mut self) {
        self.state = Vector4::zeros();
        self.covariance = Matrix4::identity();
        self.initialized = false;
    }

    fn name(&self) -> &str {
        "KalmanFilter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kalman_filter() {
        let mut filter = KalmanFilter::new(0.1, 1e-3);

        // First measurement initializes the filter
        assert_eq!(filter.apply(0.5, 0.5), (0.5, 0.5));

        // Subsequent measurements are pulled toward, not onto, the input
        let (x, y) = filter.apply(0.6, 0.4);
        assert!(x > 0.5 && x < 0.6, "x = {x}");
        assert!(y < 0.5 && y > 0.4, "y = {y}");
    }

    #[test]
    fn test_converges_on_steady_input() {
        let mut filter = KalmanFilter::new(0.1, 1e-3);
        let mut out = (0.0, 0.0);
        for _ in 0..200 {
            out = filter.apply(0.25, 0.75);
        }
        assert!((out.0 - 0.25).abs() < 1e-3);
        assert!((out.1 - 0.75).abs() < 1e-3);
    }

    #[test]
    fn test_reset() {
        let mut filter = KalmanFilter::new(0.1, 1e-3);
        filter.apply(0.1, 0.1);
        filter.apply(0.2, 0.2);
        filter.reset();
        assert_eq!(filter.apply(0.9, 0.8), (0.9, 0.8));
    }
}
