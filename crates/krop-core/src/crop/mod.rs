//! Crop geometry resolver.
//!
//! Converts the live transform plus the container, child and original image
//! sizes into:
//!
//! 1. A crop window in container coordinates, used to draw the hint overlay
//! 2. A pixel rectangle in the original image, handed to the codec
//!
//! # Coordinate System
//!
//! - Container and child coordinates are in layout pixels, origin top-left
//! - The child is placed centred in the container before the transform applies
//! - Image pixel rectangles are in source resolution, origin top-left

mod fit;
mod pixel;
mod window;

pub use fit::{resolve_initial_scale, ContentFit};
pub use pixel::compute_image_pixel_rect;
pub use window::{compute_crop_area, compute_crop_window, compute_start_point, CropGeometry};
