//! JavaScript wrapper around the crop controller.
//!
//! The host page owns gesture recognition and drawing. It forwards layout
//! sizes and decoded gestures to a [`JsCropper`], calls [`JsCropper::frame`]
//! from `requestAnimationFrame`, and reads back the transform and hint
//! geometry to render.
//!
//! # Example
//!
//! ```typescript
//! import { JsCropper } from '@krop/wasm';
//!
//! const cropper = new JsCropper({ content_fit: 'fit', max_scale: 5 });
//! cropper.set_image(new Uint8Array(await file.arrayBuffer()));
//! cropper.update_container_and_child(300, 300, 300, 400);
//!
//! function tick(time: number) {
//!   cropper.frame(time);
//!   render(cropper.scale, cropper.translate_x, cropper.translate_y);
//!   requestAnimationFrame(tick);
//! }
//! requestAnimationFrame(tick);
//!
//! const png = cropper.crop();
//! ```

use std::fmt::Display;

use krop_core::codec::{decode_image, SourceImage};
use krop_core::{
    ContentFit, CropController, CropperConfig, GestureState, Offset, SavedTransform, Size,
};
use wasm_bindgen::prelude::*;

/// Crop controller handle for JavaScript.
#[wasm_bindgen]
pub struct JsCropper {
    inner: CropController,
}

impl JsCropper {
    /// Build from an already parsed configuration.
    pub fn from_config(config: CropperConfig) -> Result<JsCropper, krop_core::CropError> {
        Ok(Self {
            inner: CropController::new(config)?,
        })
    }

    pub fn controller(&self) -> &CropController {
        &self.inner
    }
}

#[wasm_bindgen]
impl JsCropper {
    /// Create a cropper from a settings object; `undefined` uses the defaults.
    ///
    /// Missing fields fall back to their defaults, so `{ max_scale: 5 }` is valid.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<JsCropper, JsValue> {
        let config = parse_config(config)?;
        Self::from_config(config).map_err(to_js_error)
    }

    /// Rebuild a cropper from the array returned by [`save`](Self::save).
    pub fn restore(config: JsValue, saved: Vec<f32>) -> Result<JsCropper, JsValue> {
        let config = parse_config(config)?;
        let values: [f32; 5] = saved
            .try_into()
            .map_err(|v: Vec<f32>| to_js_error(format!("Expected 5 saved values, got {}", v.len())))?;
        let inner = CropController::restore(config, SavedTransform::from_array(values))
            .map_err(to_js_error)?;
        Ok(Self { inner })
    }

    /// `[translate_x, translate_y, scale, min_scale, max_scale]`.
    pub fn save(&self) -> Vec<f32> {
        self.inner.save().to_array().to_vec()
    }

    /// Decode PNG or JPEG bytes and use them as the crop source.
    pub fn set_image(&mut self, bytes: &[u8]) -> Result<(), JsValue> {
        let image = decode_image(bytes).map_err(to_js_error)?;
        self.inner.prepare_image(image);
        Ok(())
    }

    /// Use raw RGB pixels (3 bytes per pixel, row-major) as the crop source.
    pub fn set_image_rgb(&mut self, width: u32, height: u32, pixels: Vec<u8>) -> Result<(), JsValue> {
        let image = SourceImage::new(width, height, pixels).map_err(to_js_error)?;
        self.inner.prepare_image(image);
        Ok(())
    }

    pub fn update_container(&mut self, width: u32, height: u32) {
        self.inner.update_container(Size::new(width, height));
    }

    pub fn update_child(&mut self, width: u32, height: u32) {
        self.inner.update_child(Size::new(width, height));
    }

    pub fn update_container_and_child(
        &mut self,
        container_width: u32,
        container_height: u32,
        child_width: u32,
        child_height: u32,
    ) {
        self.inner.update_container_and_child(
            Size::new(container_width, container_height),
            Size::new(child_width, child_height),
        );
    }

    /// One of `fit`, `crop`, `fill_width`, `fill_height`, `none`.
    #[wasm_bindgen(getter)]
    pub fn content_fit(&self) -> String {
        self.inner.config().content_fit.to_string()
    }

    /// Switch the fit policy by name and re-apply its baseline scale.
    pub fn set_content_fit(&mut self, fit: &str) -> Result<(), JsValue> {
        let fit: ContentFit = fit.parse().map_err(to_js_error)?;
        self.inner.set_content_fit(fit);
        Ok(())
    }

    pub fn drag_start(&mut self) {
        self.inner.on_drag_start();
    }

    /// Pan by `(dx, dy)`; `(x, y)` is the pointer position at `time_ms`.
    pub fn drag(&mut self, dx: f32, dy: f32, time_ms: f64, x: f32, y: f32) {
        self.inner
            .on_drag(Offset::new(dx, dy), time_ms, Offset::new(x, y));
    }

    pub fn drag_end(&mut self) {
        self.inner.on_drag_end();
    }

    pub fn pointers_changed(&mut self, count: usize) {
        self.inner.on_pointers_changed(count);
    }

    pub fn transform_gesture(&mut self, focal_x: f32, focal_y: f32, pan_x: f32, pan_y: f32, zoom: f32) {
        self.inner.on_transform_gesture(
            Offset::new(focal_x, focal_y),
            Offset::new(pan_x, pan_y),
            zoom,
        );
    }

    pub fn double_tap(&mut self, x: f32, y: f32, target_scale: f32) {
        self.inner.on_double_tap(Offset::new(x, y), target_scale);
    }

    /// Animate the scale to `target`.
    pub fn zoom_to(&mut self, target: f32) {
        self.inner.launch_scale_to(target);
    }

    pub fn zoom_by(&mut self, factor: f32) {
        self.inner.zoom_by(factor);
    }

    pub fn stop_animation(&mut self) {
        self.inner.stop_animation();
    }

    /// Advance to `time_ms`. Returns true while an animation is running.
    pub fn frame(&mut self, time_ms: f64) -> bool {
        self.inner.on_frame(time_ms)
    }

    #[wasm_bindgen(getter)]
    pub fn scale(&self) -> f32 {
        self.inner.scale()
    }

    #[wasm_bindgen(getter)]
    pub fn translate_x(&self) -> f32 {
        self.inner.transform().translate_x
    }

    #[wasm_bindgen(getter)]
    pub fn translate_y(&self) -> f32 {
        self.inner.transform().translate_y
    }

    #[wasm_bindgen(getter)]
    pub fn is_animating(&self) -> bool {
        self.inner.is_animating()
    }

    #[wasm_bindgen(getter)]
    pub fn hint_visible(&self) -> bool {
        self.inner.hint_visible()
    }

    /// One of `idle`, `dragging`, `pinch_zooming`, `animating`.
    #[wasm_bindgen(getter)]
    pub fn gesture_state(&self) -> String {
        gesture_name(self.inner.gesture_state()).to_string()
    }

    /// `{ x, y, width, height }` of the hint window in container coordinates.
    pub fn crop_window(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner.crop_window()).map_err(to_js_error)
    }

    /// Grid lines local to the crop window, empty while the hint is hidden.
    pub fn grid_lines(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner.grid_lines()).map_err(to_js_error)
    }

    /// `{ x, y, width, height }` of the visible region in source pixels.
    pub fn crop_rect(&self) -> Result<JsValue, JsValue> {
        let rect = self.inner.crop_rect().map_err(to_js_error)?;
        serde_wasm_bindgen::to_value(&rect).map_err(to_js_error)
    }

    /// Encode the visible region as PNG.
    pub fn crop(&self) -> Result<Vec<u8>, JsValue> {
        self.inner.crop().map_err(to_js_error)
    }
}

fn parse_config(value: JsValue) -> Result<CropperConfig, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(CropperConfig::default());
    }
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| to_js_error(format!("Invalid cropper config: {}", e)))
}

fn gesture_name(state: GestureState) -> &'static str {
    match state {
        GestureState::Idle => "idle",
        GestureState::Dragging => "dragging",
        GestureState::PinchZooming => "pinch_zooming",
        GestureState::AnimatingProgrammatic => "animating",
    }
}

fn to_js_error(e: impl Display) -> JsValue {
    js_sys::Error::new(&e.to_string()).into()
}
