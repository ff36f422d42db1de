use super::GazeFilter;

/// Exponential smoothing filter
pub struct ExponentialFilter {
    alpha: f64,
    last: Option<(f64, f64)>,
}

impl ExponentialFilter {
    /// `alpha` in `(0, 1]`; higher follows the input more closely
    pub const fn new(alpha: f64) -> Self {
        Self { alpha, last: None }
    }
}

impl GazeFilter for ExponentialFilter {
    fn apply(&mut self, x: f64, y: f64) -> (f64, f64) {
        let filtered = match self.last {
            Some((last_x, last_y)) => (
                self.alpha * x + (1.0 - self.alpha) * last_x,
                self.alpha * y + (1.0 - self.alpha) * last_y,
            ),
            None => (x, y),
        };
        self.last = Some(filtered);
        filtered
    }

    fn reset(&mut self) {
        self.last = None;
    }

    fn name(&self) -> &str {
        "ExponentialFilter"
    }
}
