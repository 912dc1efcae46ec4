//! Source bitmap and rectangular region extraction.

use crate::codec::CodecError;
use crate::geometry::{PixelRect, Size};

/// RGB source image held for the final crop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    width: u32,
    height: u32,
    /// RGB pixel data (3 bytes per pixel, row-major order)
    pixels: Vec<u8>,
}

impl SourceImage {
    /// Wrap RGB pixel data, validating its length against the dimensions.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, CodecError> {
        if width == 0 || height == 0 {
            return Err(CodecError::InvalidDimensions { width, height });
        }

        let expected = (width as usize) * (height as usize) * 3;
        if pixels.len() != expected {
            return Err(CodecError::InvalidPixelData {
                expected,
                actual: pixels.len(),
            });
        }

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

/// Copy the pixels of `rect` out of `image`.
///
/// Unlike a clamping crop, a rectangle that leaves the image is an error:
/// the crop engine always produces in-bounds rectangles, so anything else
/// signals a stale or mismatched source.
pub fn extract_region(image: &SourceImage, rect: PixelRect) -> Result<SourceImage, CodecError> {
    if rect.width == 0 || rect.height == 0 {
        return Err(CodecError::InvalidDimensions {
            width: rect.width,
            height: rect.height,
        });
    }
    if !rect.fits_within(image.size()) {
        return Err(CodecError::RegionOutOfBounds {
            rect,
            width: image.width,
            height: image.height,
        });
    }

    // Fast path: full region returns a clone
    if rect.x == 0 && rect.y == 0 && rect.width == image.width && rect.height == image.height {
        return Ok(image.clone());
    }

    let src_stride = image.width as usize * 3;
    let row_len = rect.width as usize * 3;
    let mut output = Vec::with_capacity(row_len * rect.height as usize);

    // Copy pixel data row by row
    for y in rect.y..rect.bottom() {
        let row_start = y as usize * src_stride + rect.x as usize * 3;
        output.extend_from_slice(&image.pixels[row_start..row_start + row_len]);
    }

    Ok(SourceImage {
        width: rect.width,
        height: rect.height,
        pixels: output,
    })
}


// ============================================================================
// Property-Based Tests
// ============================================================================
