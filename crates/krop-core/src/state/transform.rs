//! Bounded scale + translation state.
//!
//! The state owns a uniform scale limited to `[min_scale, max_scale]` and a
//! translation limited to `[-max_x, max_x] x [-max_y, max_y]`. Translation
//! bounds are only recomputed by [`TransformState::update_bounds`]; panning
//! clamps against whatever bounds are current so a drag never jitters while
//! sizes settle.

use log::debug;

use crate::error::CropError;
use crate::geometry::{Size, Transform};

/// Which translation axis an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Live transform of the child inside the container.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformState {
    min_scale: f32,
    max_scale: f32,
    scale: f32,
    translate_x: f32,
    translate_y: f32,
    max_x: f32,
    max_y: f32,
}

impl TransformState {
    /// Create a state at `min_scale` with no translation.
    ///
    /// Fails with [`CropError::InvalidConfiguration`] unless `0 <= min_scale < max_scale`.
    pub fn new(min_scale: f32, max_scale: f32) -> Result<Self, CropError> {
        Self::with_initial(min_scale, max_scale, 0.0, 0.0, min_scale)
    }

    /// Create a state with explicit initial values, as used when restoring.
    ///
    /// The scale is clamped into range. Translation is kept as given until the
    /// first [`update_bounds`](Self::update_bounds) call clamps it.
    pub fn with_initial(
        min_scale: f32,
        max_scale: f32,
        translate_x: f32,
        translate_y: f32,
        scale: f32,
    ) -> Result<Self, CropError> {
        validate_scale_limits(min_scale, max_scale)?;

        let scale = if scale.is_nan() {
            min_scale
        } else {
            scale.clamp(min_scale, max_scale)
        };

        Ok(Self {
            min_scale,
            max_scale,
            scale,
            translate_x: finite_or_zero(translate_x),
            translate_y: finite_or_zero(translate_y),
            max_x: f32::INFINITY,
            max_y: f32::INFINITY,
        })
    }

    pub fn min_scale(&self) -> f32 {
        self.min_scale
    }

    pub fn max_scale(&self) -> f32 {
        self.max_scale
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn translate_x(&self) -> f32 {
        self.translate_x
    }

    pub fn translate_y(&self) -> f32 {
        self.translate_y
    }

    /// Snapshot of the current display transform.
    pub fn transform(&self) -> Transform {
        Transform::new(self.scale, self.translate_x, self.translate_y)
    }

    /// Current translation bounds `(max_x, max_y)`.
    ///
    /// Both are infinite until the first successful [`update_bounds`](Self::update_bounds).
    pub fn bounds(&self) -> (f32, f32) {
        (self.max_x, self.max_y)
    }

    /// True while zoomed past the minimum scale.
    pub fn is_zooming(&self) -> bool {
        self.scale > self.min_scale
    }

    /// Clamp `target` into the scale range and apply it immediately.
    ///
    /// Out-of-range values are clamped, never rejected. NaN is ignored.
    pub fn set_scale(&mut self, target: f32) {
        if target.is_nan() {
            debug!("Ignoring NaN scale request");
            return;
        }
        self.scale = target.clamp(self.min_scale, self.max_scale);
    }

    /// Multiply the scale by `factor`.
    ///
    /// Non-positive or non-finite factors come from noisy gesture decoding and
    /// are ignored.
    pub fn zoom_by(&mut self, factor: f32) {
        if !factor.is_finite() || factor <= 0.0 {
            debug!("Ignoring degenerate zoom factor {factor}");
            return;
        }
        self.set_scale(self.scale * factor);
    }

    /// Translate by `(dx, dy)`, clamping each axis to the current bounds.
    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        if dx.is_finite() {
            self.set_translation(Axis::X, self.translate_x + dx);
        }
        if dy.is_finite() {
            self.set_translation(Axis::Y, self.translate_y + dy);
        }
    }

    /// Set one translation axis, clamped to its bounds.
    ///
    /// Returns true if the value had to be clamped.
    pub fn set_translation(&mut self, axis: Axis, value: f32) -> bool {
        let (slot, bound) = match axis {
            Axis::X => (&mut self.translate_x, self.max_x),
            Axis::Y => (&mut self.translate_y, self.max_y),
        };
        let clamped = value.clamp(-bound, bound);
        *slot = clamped;
        clamped != value
    }

    pub fn translation(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.translate_x,
            Axis::Y => self.translate_y,
        }
    }

    /// Recompute translation bounds for the current scale.
    ///
    /// `max_x = max(0, child_w * scale - container_w) / 2`, same for Y. When
    /// either size is not known yet, or the result is NaN, the previous
    /// bounds are kept. The current translation is re-clamped.
    pub fn update_bounds(&mut self, child: Size, container: Size) {
        if child.is_empty() || container.is_empty() {
            debug!("Skipping bounds update: child {child:?}, container {container:?}");
            return;
        }

        let (max_x, max_y) = compute_bounds(child, container, self.scale);
        if max_x.is_nan() || max_y.is_nan() {
            return;
        }

        self.max_x = max_x;
        self.max_y = max_y;
        self.translate_x = self.translate_x.clamp(-max_x, max_x);
        self.translate_y = self.translate_y.clamp(-max_y, max_y);
    }

    /// True when a horizontal drag by `dx` cannot move the content any further.
    ///
    /// Hosts use this to hand a drag over to an outer scroll container.
    pub fn is_horizontal_drag_finished(&self, dx: f32) -> bool {
        is_drag_finished(self.translate_x, self.max_x, dx)
    }

    /// Vertical counterpart of [`is_horizontal_drag_finished`](Self::is_horizontal_drag_finished).
    pub fn is_vertical_drag_finished(&self, dy: f32) -> bool {
        is_drag_finished(self.translate_y, self.max_y, dy)
    }
}

/// Translation bounds for `scale`, without NaN filtering.
pub fn compute_bounds(child: Size, container: Size, scale: f32) -> (f32, f32) {
    let max_x = (child.width as f32 * scale - container.width as f32).max(0.0) / 2.0;
    let max_y = (child.height as f32 * scale - container.height as f32).max(0.0) / 2.0;
    (max_x, max_y)
}

pub(crate) fn validate_scale_limits(min_scale: f32, max_scale: f32) -> Result<(), CropError> {
    // Written so NaN on either side fails too.
    if !(min_scale >= 0.0 && min_scale < max_scale) {
        return Err(CropError::InvalidConfiguration {
            min_scale,
            max_scale,
        });
    }
    Ok(())
}

fn is_drag_finished(value: f32, bound: f32, delta: f32) -> bool {
    if !bound.is_finite() {
        return false;
    }
    if bound == 0.0 {
        return true;
    }
    let next = value + delta;
    next <= -bound || next >= bound
}

fn finite_or_zero(value: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Strategy for non-empty sizes.
    fn size_strategy() -> impl Strategy<Value = Size> {
        (1u32..=4000, 1u32..=4000).prop_map(|(w, h)| Size::new(w, h))
    }

    proptest! {
        /// Property: Stored scale always stays within the configured range.
        #[test]
        fn prop_scale_always_clamped(
            min in 0.01f32..=5.0,
            span in 0.01f32..=10.0,
            requests in prop::collection::vec(-1.0e6f32..=1.0e6, 1..20),
        ) {
            let max = min + span;
            let mut state = TransformState::new(min, max).unwrap();
            for request in requests {
                state.set_scale(request);
                prop_assert!(state.scale() >= min && state.scale() <= max);
                state.zoom_by(request);
                prop_assert!(state.scale() >= min && state.scale() <= max);
            }
        }

        /// Property: Bounds are non-negative, and zero when content fits.
        #[test]
        fn prop_bounds_non_negative(
            child in size_strategy(),
            container in size_strategy(),
            scale in 0.1f32..=8.0,
        ) {
            let mut state = TransformState::new(0.1, 8.0).unwrap();
            state.set_scale(scale);
            state.update_bounds(child, container);
            let (max_x, max_y) = state.bounds();

            prop_assert!(max_x >= 0.0);
            prop_assert!(max_y >= 0.0);
            if child.width as f32 * state.scale() <= container.width as f32 {
                prop_assert_eq!(max_x, 0.0);
            }
            if child.height as f32 * state.scale() <= container.height as f32 {
                prop_assert_eq!(max_y, 0.0);
            }
        }

        /// Property: Updating bounds twice with the same inputs is idempotent.
        #[test]
        fn prop_update_bounds_idempotent(
            child in size_strategy(),
            container in size_strategy(),
            scale in 0.1f32..=8.0,
            (dx, dy) in (-5000.0f32..=5000.0, -5000.0f32..=5000.0),
        ) {
            let mut state = TransformState::new(0.1, 8.0).unwrap();
            state.set_scale(scale);
            state.update_bounds(child, container);
            state.pan_by(dx, dy);

            state.update_bounds(child, container);
            let first = state.clone();
            state.update_bounds(child, container);
            prop_assert_eq!(first, state);
        }

        /// Property: Panning never leaves the current bounds.
        #[test]
        fn prop_pan_stays_in_bounds(
            child in size_strategy(),
            container in size_strategy(),
            deltas in prop::collection::vec((-2000.0f32..=2000.0, -2000.0f32..=2000.0), 1..20),
        ) {
            let mut state = TransformState::new(1.0, 4.0).unwrap();
            state.set_scale(2.5);
            state.update_bounds(child, container);
            let (max_x, max_y) = state.bounds();
            for (dx, dy) in deltas {
                state.pan_by(dx, dy);
                prop_assert!(state.translate_x().abs() <= max_x);
                prop_assert!(state.translate_y().abs() <= max_y);
            }
        }
    }
}
