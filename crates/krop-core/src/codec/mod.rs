//! Image codec seam for the final crop.
//!
//! The crop engine itself never touches pixels. When a crop is requested the
//! controller hands the source bitmap and an integer [`PixelRect`] to an
//! [`ImageCodec`], which extracts the region and encodes it.
//!
//! Two codecs ship with the crate, both built on the `image` crate encoders:
//! - [`PngCodec`] - lossless, the default
//! - [`JpegCodec`] - lossy, with configurable quality
//!
//! # Example
//!
//! ```ignore
//! use krop_core::codec::{decode_image, ImageCodec, PngCodec};
//! use krop_core::geometry::PixelRect;
//!
//! let image = decode_image(&std::fs::read("photo.png").unwrap()).unwrap();
//! let png = PngCodec.encode_region(&image, PixelRect::new(0, 0, 64, 64)).unwrap();
//! ```

mod jpeg;
mod png;
mod region;

pub use jpeg::{encode_jpeg, JpegCodec};
pub use png::{encode_png, PngCodec};
pub use region::{extract_region, SourceImage};

use thiserror::Error;

use crate::geometry::PixelRect;

/// Errors that can occur while extracting or encoding a region.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 3), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The requested rectangle is not inside the source image
    #[error("Region {rect:?} lies outside the {width}x{height} source image")]
    RegionOutOfBounds {
        rect: PixelRect,
        width: u32,
        height: u32,
    },

    /// The encoder reported a failure
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),

    /// The source bytes could not be decoded
    #[error("Decoding failed: {0}")]
    DecodingFailed(String),
}

/// Extracts a region of a source image and encodes it to bytes.
pub trait ImageCodec {
    /// Encode the pixels of `rect` from `image`.
    ///
    /// Fails with [`CodecError::RegionOutOfBounds`] when `rect` is not
    /// entirely inside the image.
    fn encode_region(&self, image: &SourceImage, rect: PixelRect) -> Result<Vec<u8>, CodecError>;
}

/// Decode any PNG or JPEG byte buffer into an RGB source image.
pub fn decode_image(bytes: &[u8]) -> Result<SourceImage, CodecError> {
    let decoded =
        image::load_from_memory(bytes).map_err(|e| CodecError::DecodingFailed(e.to_string()))?;
    let rgb = decoded.to_rgb8();
    let (width, height) = rgb.dimensions();
    SourceImage::new(width, height, rgb.into_raw())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_round_trip_through_png() {
        let image = SourceImage::new(4, 3, (0..36).collect()).unwrap();
        let png = PngCodec
            .encode_region(&image, PixelRect::new(0, 0, 4, 3))
            .unwrap();

        let decoded = decode_image(&png).unwrap();
        assert_eq!(decoded.width(), 4);
        assert_eq!(decoded.height(), 3);
        assert_eq!(decoded.pixels(), image.pixels());
    }

    #[test]
    fn test_decode_garbage_fails() {
        let result = decode_image(&[0u8, 1, 2, 3, 4, 5]);
        assert!(matches!(result, Err(CodecError::DecodingFailed(_))));
    }
}
