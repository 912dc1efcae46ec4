//! Krop Core - interactive image cropping engine
//!
//! This crate holds everything a host UI needs to let a user pan and zoom an
//! image inside a fixed viewport and export the visible region: bounded
//! transform state, frame-driven animations, crop geometry and the image
//! codec. It renders nothing and recognises no gestures itself; hosts feed it
//! decoded input and draw the values it reports.
//!
//! # Usage
//!
//! ```ignore
//! use krop_core::{CropController, CropperConfig, Size};
//!
//! let mut controller = CropController::new(CropperConfig::default())?;
//! controller.prepare_image(krop_core::codec::decode_image(&bytes)?);
//! controller.update_container_and_child(Size::new(300, 300), Size::new(300, 400));
//! controller.on_double_tap(Offset::new(120.0, 80.0), 2.0);
//! while controller.on_frame(now_ms()) {}
//! let png = controller.crop()?;
//! ```

pub mod animation;
pub mod codec;
pub mod config;
pub mod controller;
pub mod crop;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod hint;
pub mod state;

pub use animation::{AnimationEnd, FrameClock};
pub use codec::{ImageCodec, JpegCodec, PngCodec, SourceImage};
pub use config::CropperConfig;
pub use controller::CropController;
pub use crop::{ContentFit, CropGeometry};
pub use error::CropError;
pub use geometry::{Offset, PixelRect, Rect, Size, Transform, Velocity};
pub use gesture::GestureState;
pub use hint::{CropHint, GridLine};
pub use state::{SavedTransform, TransformState};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_portrait_fit_scenario() {
        let config = CropperConfig::default().with_scale_limits(0.5, 10.0);
        let mut controller = CropController::new(config).unwrap();
        controller.update_container_and_child(Size::new(300, 300), Size::new(300, 400));
        assert_eq!(controller.scale(), 0.75);

        controller.zoom_by(2.0);
        assert_eq!(controller.scale(), 1.5);
    }

    #[test]
    fn test_zoom_respects_max_scale() {
        let config = CropperConfig::default().with_scale_limits(0.5, 1.2);
        let mut controller = CropController::new(config).unwrap();
        controller.update_container_and_child(Size::new(300, 300), Size::new(300, 400));
        controller.zoom_by(2.0);
        assert_eq!(controller.scale(), 1.2);
    }

    #[test]
    fn test_decode_prepare_crop() {
        let pixels = vec![200u8; 8 * 6 * 3];
        let png = codec::encode_png(&pixels, 8, 6).unwrap();
        let image = codec::decode_image(&png).unwrap();

        let config = CropperConfig::default().with_content_fit(ContentFit::None);
        let mut controller = CropController::new(config).unwrap();
        controller.update_container(Size::new(8, 6));
        controller.prepare_image(image);

        let out = controller.crop().unwrap();
        let decoded = codec::decode_image(&out).unwrap();
        assert_eq!(decoded.size(), Size::new(8, 6));
    }
}
