//! JPEG output for cropped regions.
//!
//! Uses the `image` crate's JPEG encoder with a configurable quality, for
//! hosts that prefer smaller files over lossless output.

use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;
use serde::{Deserialize, Serialize};
use std::io::Cursor;

use crate::codec::{extract_region, CodecError, ImageCodec, SourceImage};
use crate::geometry::PixelRect;

/// Encodes cropped regions as JPEG.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JpegCodec {
    /// JPEG quality (1-100, where 100 is highest quality)
    pub quality: u8,
}

impl Default for JpegCodec {
    fn default() -> Self {
        Self { quality: 90 }
    }
}

impl JpegCodec {
    pub fn new(quality: u8) -> Self {
        Self { quality }
    }
}

impl ImageCodec for JpegCodec {
    fn encode_region(&self, image: &SourceImage, rect: PixelRect) -> Result<Vec<u8>, CodecError> {
        let region = extract_region(image, rect)?;
        encode_jpeg(region.pixels(), region.width(), region.height(), self.quality)
    }
}

/// Encode RGB pixel data to JPEG bytes.
///
/// # Quality Guidelines
///
/// * 90-100: High quality, suitable for further editing
/// * 60-90: Good quality for sharing
/// * Below 60: Visible artifacts
pub fn encode_jpeg(
    pixels: &[u8],
    width: u32,
    height: u32,
    quality: u8,
) -> Result<Vec<u8>, CodecError> {
    // Clamp quality to valid range (1-100)
    let quality = quality.clamp(1, 100);

    let mut buffer = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
    encoder
        .write_image(pixels, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| CodecError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}
