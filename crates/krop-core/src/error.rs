//! Error types surfaced by the crop engine.
//!
//! Geometry queries never fail for transient "not ready" states; they return
//! neutral values instead. Only construction and [`crate::CropController::crop`]
//! produce observable errors.

use thiserror::Error;

use crate::codec::CodecError;

/// Errors returned by construction, restore and crop requests.
#[derive(Debug, Error)]
pub enum CropError {
    /// Image dimensions are not known yet (no image prepared, or zero child size).
    #[error("Image is not ready for cropping: {0}")]
    NotReady(&'static str),

    /// Scale limits do not describe a non-empty range.
    #[error("Invalid scale limits: expected 0 <= min_scale < max_scale, got min_scale ({min_scale}) and max_scale ({max_scale})")]
    InvalidConfiguration { min_scale: f32, max_scale: f32 },

    /// An animation or timing setting would stall or never settle.
    #[error("Invalid setting: {name} must be positive and finite, got {value}")]
    InvalidSetting { name: &'static str, value: f64 },

    /// The image codec failed to extract or encode the region.
    #[error(transparent)]
    Codec(#[from] CodecError),
}
