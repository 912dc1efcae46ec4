//! Save and restore of the transform across host lifecycle events.

use serde::{Deserialize, Serialize};

use crate::error::CropError;
use crate::state::TransformState;

/// The five scalars needed to rebuild a [`TransformState`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SavedTransform {
    pub translate_x: f32,
    pub translate_y: f32,
    pub scale: f32,
    pub min_scale: f32,
    pub max_scale: f32,
}

impl SavedTransform {
    /// Capture the current values of `state`.
    pub fn capture(state: &TransformState) -> Self {
        Self {
            translate_x: state.translate_x(),
            translate_y: state.translate_y(),
            scale: state.scale(),
            min_scale: state.min_scale(),
            max_scale: state.max_scale(),
        }
    }

    /// Rebuild a state, applying the same validation as construction.
    pub fn restore(&self) -> Result<TransformState, CropError> {
        TransformState::with_initial(
            self.min_scale,
            self.max_scale,
            self.translate_x,
            self.translate_y,
            self.scale,
        )
    }

    /// Flat list form, in `[translate_x, translate_y, scale, min_scale, max_scale]` order.
    pub fn to_array(&self) -> [f32; 5] {
        [
            self.translate_x,
            self.translate_y,
            self.scale,
            self.min_scale,
            self.max_scale,
        ]
    }

    pub fn from_array(values: [f32; 5]) -> Self {
        let [translate_x, translate_y, scale, min_scale, max_scale] = values;
        Self {
            translate_x,
            translate_y,
            scale,
            min_scale,
            max_scale,
        }
    }
}

impl From<&TransformState> for SavedTransform {
    fn from(state: &TransformState) -> Self {
        Self::capture(state)
    }
}
