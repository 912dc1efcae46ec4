//! Controller configuration.
//!
//! Every field has a default, so hosts can deserialize partial settings
//! (e.g. only `content_fit`) and get sensible values for the rest.

use serde::{Deserialize, Serialize};

use crate::animation::{DecaySpec, SpringSpec};
use crate::crop::ContentFit;
use crate::error::CropError;
use crate::hint::{CropHint, DEFAULT_HINT_TIMEOUT_MS};
use crate::state::validate_scale_limits;

/// Settings for a [`crate::CropController`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropperConfig {
    /// Lower scale limit. Must be less than `max_scale`.
    pub min_scale: f32,
    /// Upper scale limit.
    pub max_scale: f32,
    /// Baseline scaling re-applied whenever the child or container size changes.
    pub content_fit: ContentFit,
    /// Delay before the hint grid hides after the last interaction.
    pub hint_timeout_ms: f64,
    /// Overlay colours; `None` disables the hint grid.
    pub hint: Option<CropHint>,
    /// Spring used for double-tap and programmatic transitions.
    pub spring: SpringSpec,
    /// Decay used for flings.
    pub decay: DecaySpec,
    /// Release velocity is divided by this before a fling starts.
    pub fling_velocity_divisor: f32,
    /// Frame spacing used by headless driving.
    pub frame_interval_ms: f64,
}

impl Default for CropperConfig {
    fn default() -> Self {
        Self {
            min_scale: 1.0,
            max_scale: f32::MAX,
            content_fit: ContentFit::Fit,
            hint_timeout_ms: DEFAULT_HINT_TIMEOUT_MS,
            hint: Some(CropHint::DEFAULT),
            spring: SpringSpec::default(),
            decay: DecaySpec::default(),
            fling_velocity_divisor: 2.0,
            frame_interval_ms: 16.0,
        }
    }
}

impl CropperConfig {
    /// Check the scale limits and the settings animations depend on.
    ///
    /// An undamped or stiffness-free spring never comes to rest, and a
    /// non-positive frame interval stalls headless driving.
    pub fn validate(&self) -> Result<(), CropError> {
        validate_scale_limits(self.min_scale, self.max_scale)?;
        let settings = [
            ("spring.damping_ratio", self.spring.damping_ratio as f64),
            ("spring.stiffness", self.spring.stiffness as f64),
            ("spring.visibility_threshold", self.spring.visibility_threshold as f64),
            ("decay.friction_multiplier", self.decay.friction_multiplier as f64),
            ("decay.velocity_threshold", self.decay.velocity_threshold as f64),
            ("fling_velocity_divisor", self.fling_velocity_divisor as f64),
            ("frame_interval_ms", self.frame_interval_ms),
        ];
        for (name, value) in settings {
            // Written so NaN fails too.
            if !(value > 0.0 && value.is_finite()) {
                return Err(CropError::InvalidSetting { name, value });
            }
        }
        Ok(())
    }

    pub fn with_scale_limits(mut self, min_scale: f32, max_scale: f32) -> Self {
        self.min_scale = min_scale;
        self.max_scale = max_scale;
        self
    }

    pub fn with_content_fit(mut self, content_fit: ContentFit) -> Self {
        self.content_fit = content_fit;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(CropperConfig::default().validate().is_ok());
    }

    #[test]
    fn test_inverted_limits_invalid() {
        let config = CropperConfig::default().with_scale_limits(2.0, 1.0);
        assert!(matches!(
            config.validate(),
            Err(CropError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_undamped_spring_rejected() {
        let mut config = CropperConfig::default();
        config.spring.damping_ratio = 0.0;
        assert!(matches!(
            config.validate(),
            Err(CropError::InvalidSetting {
                name: "spring.damping_ratio",
                ..
            })
        ));
    }

    #[test]
    fn test_stalled_frame_interval_rejected() {
        for interval in [0.0, -16.0, f64::NAN] {
            let mut config = CropperConfig::default();
            config.frame_interval_ms = interval;
            assert!(matches!(
                config.validate(),
                Err(CropError::InvalidSetting {
                    name: "frame_interval_ms",
                    ..
                })
            ));
        }
    }

    #[test]
    fn test_zero_fling_divisor_rejected() {
        let mut config = CropperConfig::default();
        config.fling_velocity_divisor = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: CropperConfig =
            serde_json::from_str(r#"{ "content_fit": "crop", "max_scale": 5.0 }"#).unwrap();
        assert_eq!(config.content_fit, ContentFit::Crop);
        assert_eq!(config.max_scale, 5.0);
        assert_eq!(config.min_scale, 1.0);
        assert_eq!(config.hint_timeout_ms, 1500.0);
        assert_eq!(config.spring, SpringSpec::default());
    }

    #[test]
    fn test_nested_spec_partial() {
        let config: CropperConfig =
            serde_json::from_str(r#"{ "spring": { "stiffness": 400.0 } }"#).unwrap();
        assert_eq!(config.spring.stiffness, 400.0);
        assert_eq!(config.spring.damping_ratio, 1.0);
    }
}
