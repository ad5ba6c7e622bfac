//! Shared utilities

use std::collections::VecDeque;
use std::time::Instant;

// ============================================================================
// FPS Counter
// ============================================================================

/// Frame timing with a rolling average
pub struct FpsCounter {
    frame_times: VecDeque<f32>,
    last_frame: Instant,
    sample_count: usize,
}

impl FpsCounter {
    /// Create a new FPS counter with specified sample window
    pub fn new(sample_count: usize) -> Self {
        Self {
            frame_times: VecDeque::with_capacity(sample_count),
            last_frame: Instant::now(),
            sample_count: sample_count.max(1),
        }
    }

    /// Call at the start of each frame to record wall-clock timing
    /// Returns (delta_time, current_fps, average_fps)
    pub fn tick(&mut self) -> (f32, f32, f32) {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.record(dt)
    }

    /// Record a frame of known duration (seconds)
    /// Returns (delta_time, current_fps, average_fps)
    pub fn record(&mut self, dt: f32) -> (f32, f32, f32) {
        self.frame_times.push_back(dt);
        if self.frame_times.len() > self.sample_count {
            self.frame_times.pop_front();
        }

        let current_fps = if dt > 0.0 { 1.0 / dt } else { 0.0 };
        let avg_dt = self.avg_frame_time();
        let avg_fps = if avg_dt > 0.0 { 1.0 / avg_dt } else { 0.0 };

        (dt, current_fps, avg_fps)
    }

    fn avg_frame_time(&self) -> f32 {
        self.frame_times.iter().sum::<f32>() / self.frame_times.len().max(1) as f32
    }

    /// Get the average frame time in milliseconds
    pub fn avg_frame_time_ms(&self) -> f32 {
        self.avg_frame_time() * 1000.0
    }

    /// Get min/max FPS from sample window
    pub fn min_max_fps(&self) -> (f32, f32) {
        if self.frame_times.is_empty() {
            return (0.0, 0.0);
        }
        let min_dt = self.frame_times.iter().copied().fold(f32::INFINITY, f32::min);
        let max_dt = self.frame_times.iter().copied().fold(0.0, f32::max);
        let max_fps = if min_dt > 0.0 { 1.0 / min_dt } else { 0.0 };
        let min_fps = if max_dt > 0.0 { 1.0 / max_dt } else { 0.0 };
        (min_fps, max_fps)
    }

    /// Number of frames currently in the window
    pub fn frame_count(&self) -> usize {
        self.frame_times.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_reports_rates() {
        let mut fps = FpsCounter::new(4);
        let (dt, current, avg) = fps.record(0.5);
        assert_eq!(dt, 0.5);
        assert_eq!(current, 2.0);
        assert_eq!(avg, 2.0);

        let (_, current, avg) = fps.record(0.25);
        assert_eq!(current, 4.0);
        assert!((avg - 1.0 / 0.375).abs() < 1e-4);
    }

    #[test]
    fn test_window_is_bounded() {
        let mut fps = FpsCounter::new(3);
        for _ in 0..10 {
            fps.record(0.1);
        }
        fps.record(0.5);
        assert_eq!(fps.frame_count(), 3);
        let (min, max) = fps.min_max_fps();
        assert_eq!(min, 2.0);
        assert!((max - 10.0).abs() < 1e-4);
        assert!((fps.avg_frame_time_ms() - 700.0 / 3.0).abs() < 1e-2);
    }

    #[test]
    fn test_zero_dt_does_not_divide_by_zero() {
        let mut fps = FpsCounter::new(2);
        assert_eq!(fps.record(0.0), (0.0, 0.0, 0.0));
        assert_eq!(FpsCounter::new(2).min_max_fps(), (0.0, 0.0));
    }
}
