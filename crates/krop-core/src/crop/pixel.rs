//! Conversion from container-space crop geometry to original image pixels.
//!
//! Division by `scale` undoes the live zoom, recovering coordinates in the
//! displayed child. Multiplication by `ratio = original_width / child_width`
//! then lifts those coordinates to the source resolution, which is larger
//! than the displayed bitmap for downscaled previews.

use crate::error::CropError;
use crate::geometry::{Offset, PixelRect};

/// Map the visible area back onto the original image.
///
/// # Arguments
///
/// * `start_point` - Offset into the scaled content where the visible area begins
/// * `crop_area` - Visible extent in container pixels
/// * `scale` - Current display scale
/// * `original_width` - True pixel width of the source image
/// * `child_width` - Width of the displayed child
///
/// # Errors
///
/// Returns [`CropError::NotReady`] when `child_width`, `original_width` or
/// `scale` is zero, since the ratio is undefined before the image loads.
pub fn compute_image_pixel_rect(
    start_point: Offset,
    crop_area: Offset,
    scale: f32,
    original_width: u32,
    child_width: u32,
) -> Result<PixelRect, CropError> {
    if child_width == 0 {
        return Err(CropError::NotReady("child width is zero"));
    }
    if original_width == 0 {
        return Err(CropError::NotReady("original image width is zero"));
    }
    if !(scale > 0.0) || !scale.is_finite() {
        return Err(CropError::NotReady("display scale is not positive"));
    }

    let ratio = if original_width == child_width {
        1.0
    } else {
        original_width as f64 / child_width as f64
    };
    let scale = scale as f64;
    let to_pixels = |v: f32| (ratio * v as f64 / scale).floor().max(0.0) as u32;

    Ok(PixelRect::new(
        to_pixels(start_point.x),
        to_pixels(start_point.y),
        to_pixels(crop_area.x),
        to_pixels(crop_area.y),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity() {
        let rect =
            compute_image_pixel_rect(Offset::ZERO, Offset::new(300.0, 200.0), 1.0, 300, 300)
                .unwrap();
        assert_eq!(rect, PixelRect::new(0, 0, 300, 200));
    }

    #[test]
    fn test_zoom_is_undone() {
        let rect = compute_image_pixel_rect(
            Offset::new(100.0, 250.0),
            Offset::new(300.0, 300.0),
            2.0,
            300,
            300,
        )
        .unwrap();
        assert_eq!(rect, PixelRect::new(50, 125, 150, 150));
    }

    #[test]
    fn test_downscaled_preview_is_upscaled() {
        // A 4000px original shown as a 1000px preview.
        let rect = compute_image_pixel_rect(
            Offset::new(10.0, 20.0),
            Offset::new(300.0, 300.0),
            1.5,
            4000,
            1000,
        )
        .unwrap();
        // 4 * 10 / 1.5 = 26.67, 4 * 20 / 1.5 = 53.33, 4 * 300 / 1.5 = 800
        assert_eq!(rect, PixelRect::new(26, 53, 800, 800));
    }

    #[test]
    fn test_zero_child_width_not_ready() {
        let result =
            compute_image_pixel_rect(Offset::ZERO, Offset::new(10.0, 10.0), 1.0, 100, 0);
        assert!(matches!(result, Err(CropError::NotReady(_))));
    }

    #[test]
    fn test_zero_original_width_not_ready() {
        let result =
            compute_image_pixel_rect(Offset::ZERO, Offset::new(10.0, 10.0), 1.0, 0, 100);
        assert!(matches!(result, Err(CropError::NotReady(_))));
    }

    #[test]
    fn test_zero_scale_not_ready() {
        let result =
            compute_image_pixel_rect(Offset::ZERO, Offset::new(10.0, 10.0), 0.0, 100, 100);
        assert!(matches!(result, Err(CropError::NotReady(_))));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
