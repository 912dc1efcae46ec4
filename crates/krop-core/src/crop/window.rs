//! Container-space crop geometry.
//!
//! Two related quantities are derived from the live transform:
//!
//! - The **start point**: how far into the scaled content the visible area
//!   begins. Clamped at zero since content cannot be scrolled before its origin.
//! - The **crop window**: where inside the container the visible content sits,
//!   used to place the hint overlay. Its offset is signed, and negative when
//!   the scaled content is smaller than the container.
//!
//! ```text
//! start_x  = max(0, max(0, (child_w * s - container_w) / 2) - tx)
//! area_w   = min(child_w * s, container_w)
//! window_x = (child_w * s - container_w) / 2   if negative, else 0
//! ```

use crate::geometry::{Offset, Rect, Size, Transform};

/// Start point, visible extent and hint window for one transform.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CropGeometry {
    /// Offset into the scaled content where the visible area begins.
    pub start_point: Offset,
    /// Width and height of the visible area, in container pixels.
    pub crop_area: Offset,
    /// Hint overlay rectangle in container coordinates.
    pub window: Rect,
}

impl CropGeometry {
    /// Resolve all three quantities, or `None` while sizes are unknown.
    pub fn resolve(container: Size, child: Size, transform: &Transform) -> Option<Self> {
        if container.is_empty() || child.is_empty() {
            return None;
        }
        Some(Self {
            start_point: compute_start_point(container, child, transform),
            crop_area: compute_crop_area(container, child, transform.scale),
            window: compute_crop_window(container, child, transform),
        })
    }
}

/// Offset into the scaled content where the visible area begins.
pub fn compute_start_point(container: Size, child: Size, transform: &Transform) -> Offset {
    let (overflow_x, overflow_y) = half_overflow(container, child, transform.scale);
    Offset::new(
        (overflow_x.max(0.0) - transform.translate_x).max(0.0),
        (overflow_y.max(0.0) - transform.translate_y).max(0.0),
    )
}

/// Extent of the scaled content visible in the container.
pub fn compute_crop_area(container: Size, child: Size, scale: f32) -> Offset {
    Offset::new(
        (child.width as f32 * scale).min(container.width as f32),
        (child.height as f32 * scale).min(container.height as f32),
    )
}

/// The crop window in container coordinates.
///
/// Returns [`Rect::ZERO`] while either size is unknown.
pub fn compute_crop_window(container: Size, child: Size, transform: &Transform) -> Rect {
    if container.is_empty() || child.is_empty() {
        return Rect::ZERO;
    }

    let (overflow_x, overflow_y) = half_overflow(container, child, transform.scale);
    let offset = Offset::new(overflow_x.min(0.0), overflow_y.min(0.0));
    let size = compute_crop_area(container, child, transform.scale);
    Rect::from_offset_size(offset, size)
}

/// `(child * scale - container) / 2` per axis, signed.
fn half_overflow(container: Size, child: Size, scale: f32) -> (f32, f32) {
    (
        (child.width as f32 * scale - container.width as f32) / 2.0,
        (child.height as f32 * scale - container.height as f32) / 2.0,
    )
}
