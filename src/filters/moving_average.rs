use super::GazeFilter;
use std::collections::VecDeque;

/// Moving average over the last `window_size` points
pub struct MovingAverageFilter {
    window_size: usize,
    window: VecDeque<(f64, f64)>,
}

impl MovingAverageFilter {
    pub fn new(window_size: usize) -> Self {
        Self {
            window_size,
            window: VecDeque::with_capacity(window_size),
        }
    }
}

impl GazeFilter for MovingAverageFilter {
    #[allow(clippy::cast_precision_loss)] // Window sizes are tiny
    fn apply(&mut self, x: f64, y: f64) -> (f64, f64) {
        while self.window.len() >= self.window_size.max(1) {
            self.window.pop_front();
        }
        self.window.push_back((x, y));

        let n = self.window.len() as f64;
        let (sum_x, sum_y) = self
            .window
            .iter()
            .fold((0.0, 0.0), |(sx, sy), &(px, py)| (sx + px, sy + py));
        (sum_x / n, sum_y / n)
    }

    fn reset(&mut self) {
        self.window.clear();
    }

    fn name(&self) -> &str {
        "MovingAverageFilter"
    }
}
