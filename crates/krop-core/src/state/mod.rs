//! Transform state: the bounded scale and translation of the displayed child.
//!
//! [`TransformState`] is a plain struct. Hosts refresh its translation bounds
//! explicitly through [`TransformState::update_bounds`] whenever the scale or
//! one of the sizes changes; nothing is tracked automatically.

mod saved;
mod transform;

pub use saved::SavedTransform;
pub use transform::{compute_bounds, Axis, TransformState};

pub(crate) use transform::validate_scale_limits;
