//! Damped spring model for smooth value transitions.
//!
//! The spring is solved analytically for a displacement `x0` from the target
//! and an initial velocity `v0`:
//!
//! ```text
//! x'' = -stiffness * x - 2 * damping_ratio * sqrt(stiffness) * x'
//! ```
//!
//! Under-, critically and over-damped ratios are all supported.

use serde::{Deserialize, Serialize};

/// Parameters of a spring transition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpringSpec {
    /// 1.0 is critically damped, below 1.0 bounces, above 1.0 creeps.
    pub damping_ratio: f32,
    /// Spring constant; larger values settle faster.
    pub stiffness: f32,
    /// Displacement and velocity below which the spring is at rest.
    pub visibility_threshold: f32,
}

impl Default for SpringSpec {
    fn default() -> Self {
        Self {
            damping_ratio: 1.0,
            stiffness: 1500.0,
            visibility_threshold: 0.01,
        }
    }
}

impl SpringSpec {
    /// Displacement from the target and velocity after `elapsed_secs`.
    pub fn displacement_at(
        &self,
        initial_displacement: f32,
        initial_velocity: f32,
        elapsed_secs: f64,
    ) -> (f32, f32) {
        let x0 = initial_displacement as f64;
        let v0 = initial_velocity as f64;
        let t = elapsed_secs.max(0.0);
        let zeta = self.damping_ratio.max(0.0) as f64;
        let omega = (self.stiffness.max(f32::MIN_POSITIVE) as f64).sqrt();

        let (x, v) = if zeta > 1.0 {
            let root = (zeta * zeta - 1.0).sqrt();
            let gamma_plus = omega * (-zeta + root);
            let gamma_minus = omega * (-zeta - root);
            let coeff_b = (gamma_minus * x0 - v0) / (gamma_minus - gamma_plus);
            let coeff_a = x0 - coeff_b;
            let e_minus = (gamma_minus * t).exp();
            let e_plus = (gamma_plus * t).exp();
            (
                coeff_a * e_minus + coeff_b * e_plus,
                coeff_a * gamma_minus * e_minus + coeff_b * gamma_plus * e_plus,
            )
        } else if zeta == 1.0 {
            let coeff_a = x0;
            let coeff_b = v0 + omega * x0;
            let decay = (-omega * t).exp();
            let x = (coeff_a + coeff_b * t) * decay;
            (x, x * -omega + coeff_b * decay)
        } else {
            let damped = omega * (1.0 - zeta * zeta).sqrt();
            let cos_coeff = x0;
            let sin_coeff = (zeta * omega * x0 + v0) / damped;
            let decay = (-zeta * omega * t).exp();
            let (sin, cos) = (damped * t).sin_cos();
            let x = decay * (cos_coeff * cos + sin_coeff * sin);
            let v = x * -zeta * omega + decay * (-damped * cos_coeff * sin + damped * sin_coeff * cos);
            (x, v)
        };

        (x as f32, v as f32)
    }

    /// True once both displacement and velocity are below the threshold.
    pub fn is_at_rest(&self, displacement: f32, velocity: f32) -> bool {
        displacement.abs() < self.visibility_threshold && velocity.abs() < self.visibility_threshold
    }
}
