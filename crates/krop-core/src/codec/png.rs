//! Lossless PNG output for cropped regions.

use image::codecs::png::PngEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;
use std::io::Cursor;

use crate::codec::{extract_region, CodecError, ImageCodec, SourceImage};
use crate::geometry::PixelRect;

/// Encodes cropped regions as PNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct PngCodec;

impl ImageCodec for PngCodec {
    fn encode_region(&self, image: &SourceImage, rect: PixelRect) -> Result<Vec<u8>, CodecError> {
        let region = extract_region(image, rect)?;
        encode_png(region.pixels(), region.width(), region.height())
    }
}

/// Encode RGB pixel data to PNG bytes.
pub fn encode_png(pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>, CodecError> {
    let mut buffer = Cursor::new(Vec::new());
    PngEncoder::new(&mut buffer)
        .write_image(pixels, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| CodecError::EncodingFailed(e.to_string()))?;
    Ok(buffer.into_inner())
}
