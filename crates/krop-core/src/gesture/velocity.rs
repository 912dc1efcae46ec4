//! Release velocity estimation for drags.
//!
//! Keeps the most recent pointer positions and fits a straight line through
//! the samples of the last [`HORIZON_MS`] milliseconds, per axis. The slope
//! is the velocity.

use std::collections::VecDeque;

use crate::geometry::{Offset, Velocity};

/// Samples older than this, relative to the newest, are ignored.
pub const HORIZON_MS: f64 = 100.0;

const MAX_SAMPLES: usize = 20;

/// Least-squares velocity tracker.
#[derive(Debug, Clone, Default)]
pub struct VelocityTracker {
    samples: VecDeque<(f64, Offset)>,
}

impl VelocityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a pointer position at `time_ms`.
    pub fn add_position(&mut self, time_ms: f64, position: Offset) {
        if let Some(&(last, _)) = self.samples.back() {
            if time_ms < last {
                // Clock went backwards; start over rather than fit garbage.
                self.samples.clear();
            }
        }
        if self.samples.len() == MAX_SAMPLES {
            self.samples.pop_front();
        }
        self.samples.push_back((time_ms, position));
    }

    pub fn reset(&mut self) {
        self.samples.clear();
    }

    /// Velocity in pixels per second, or zero with fewer than two recent samples.
    pub fn velocity(&self) -> Velocity {
        let Some(&(newest, _)) = self.samples.back() else {
            return Velocity::ZERO;
        };

        let recent: Vec<(f64, Offset)> = self
            .samples
            .iter()
            .copied()
            .filter(|(t, _)| newest - t <= HORIZON_MS)
            .collect();
        if recent.len() < 2 {
            return Velocity::ZERO;
        }

        let xs: Vec<(f64, f64)> = recent.iter().map(|(t, p)| (*t, p.x as f64)).collect();
        let ys: Vec<(f64, f64)> = recent.iter().map(|(t, p)| (*t, p.y as f64)).collect();

        // Slopes are per millisecond.
        Velocity::new(
            (slope(&xs) * 1000.0) as f32,
            (slope(&ys) * 1000.0) as f32,
        )
    }
}

fn slope(points: &[(f64, f64)]) -> f64 {
    let n = points.len() as f64;
    let mean_t = points.iter().map(|(t, _)| t).sum::<f64>() / n;
    let mean_v = points.iter().map(|(_, v)| v).sum::<f64>() / n;

    let (num, den) = points.iter().fold((0.0, 0.0), |(num, den), (t, v)| {
        let dt = t - mean_t;
        (num + dt * (v - mean_v), den + dt * dt)
    });
    if den == 0.0 {
        0.0
    } else {
        num / den
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_tracker_is_still() {
        assert_eq!(VelocityTracker::new().velocity(), Velocity::ZERO);
    }

    #[test]
    fn test_single_sample_is_still() {
        let mut tracker = VelocityTracker::new();
        tracker.add_position(0.0, Offset::new(5.0, 5.0));
        assert_eq!(tracker.velocity(), Velocity::ZERO);
    }

    #[test]
    fn test_constant_motion() {
        let mut tracker = VelocityTracker::new();
        for i in 0..6 {
            let t = i as f64 * 10.0;
            // 2 px/ms right, 1 px/ms up
            tracker.add_position(t, Offset::new(2.0 * t as f32, -(t as f32)));
        }
        let v = tracker.velocity();
        assert!((v.x - 2000.0).abs() < 1.0, "vx = {}", v.x);
        assert!((v.y + 1000.0).abs() < 1.0, "vy = {}", v.y);
    }

    #[test]
    fn test_old_samples_ignored() {
        let mut tracker = VelocityTracker::new();
        // Fast early motion, then a pause longer than the horizon.
        tracker.add_position(0.0, Offset::new(0.0, 0.0));
        tracker.add_position(10.0, Offset::new(500.0, 0.0));
        tracker.add_position(300.0, Offset::new(500.0, 0.0));
        assert_eq!(tracker.velocity(), Velocity::ZERO);
    }

    #[test]
    fn test_reset_clears() {
        let mut tracker = VelocityTracker::new();
        tracker.add_position(0.0, Offset::ZERO);
        tracker.add_position(10.0, Offset::new(10.0, 0.0));
        tracker.reset();
        assert_eq!(tracker.velocity(), Velocity::ZERO);
    }

    #[test]
    fn test_sample_cap() {
        let mut tracker = VelocityTracker::new();
        for i in 0..50 {
            tracker.add_position(i as f64, Offset::new(i as f32, 0.0));
        }
        assert_eq!(tracker.samples.len(), MAX_SAMPLES);
        assert!((tracker.velocity().x - 1000.0).abs() < 1.0);
    }
}
