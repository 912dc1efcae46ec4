//! Exponential velocity decay used for flings.
//!
//! ```text
//! friction = -4.2 * friction_multiplier
//! v(t)     = v0 * e^(friction * t)
//! x(t)     = x0 - v0 / friction + v0 / friction * e^(friction * t)
//! ```

use serde::{Deserialize, Serialize};

/// Parameters of an exponential decay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecaySpec {
    /// Scales the base friction; larger values stop sooner.
    pub friction_multiplier: f32,
    /// Speed (px/s) below which the motion is considered finished.
    pub velocity_threshold: f32,
}

impl Default for DecaySpec {
    fn default() -> Self {
        Self {
            friction_multiplier: 1.0,
            velocity_threshold: 0.1,
        }
    }
}

const BASE_FRICTION: f64 = -4.2;

impl DecaySpec {
    fn friction(&self) -> f64 {
        BASE_FRICTION * self.friction_multiplier.max(f32::MIN_POSITIVE) as f64
    }

    /// Value after `elapsed_secs`, starting at `initial_value` with `initial_velocity`.
    pub fn value_at(&self, initial_value: f32, initial_velocity: f32, elapsed_secs: f64) -> f32 {
        let friction = self.friction();
        let v0 = initial_velocity as f64;
        let t = elapsed_secs.min(self.duration_secs(initial_velocity)).max(0.0);
        (initial_value as f64 - v0 / friction + v0 / friction * (friction * t).exp()) as f32
    }

    /// Time until the speed drops below the threshold.
    pub fn duration_secs(&self, initial_velocity: f32) -> f64 {
        let speed = initial_velocity.abs() as f64;
        let threshold = self.velocity_threshold.max(f32::MIN_POSITIVE) as f64;
        if speed <= threshold {
            return 0.0;
        }
        (threshold / speed).ln() / self.friction()
    }
}
