//! The crop controller: one object a host feeds sizes, gestures and frames.
//!
//! # Data Flow
//!
//! ```text
//! gestures ──► TransformState ──► CropGeometry ──► hint overlay
//!                    ▲                  │
//!   frames ──► running animation        └──► pixel rect ──► ImageCodec ──► bytes
//! ```
//!
//! The transform and the sizes it depends on live in a shared `Scene` so
//! that animation futures can write to them between frames. Every write
//! recomputes the crop geometry, which keeps the hint window in step with
//! the animation.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::task::{Context, Poll};

use futures::future::{join, join3, LocalBoxFuture};
use futures::FutureExt;
use log::{debug, info, warn};

use crate::animation::{
    decay_channel, spring_channel, AnimationEnd, AnimationTarget, CancelScope, CancelToken,
    Channel, FrameClock,
};
use crate::codec::{ImageCodec, PngCodec, SourceImage};
use crate::config::CropperConfig;
use crate::crop::{compute_image_pixel_rect, resolve_initial_scale, ContentFit, CropGeometry};
use crate::error::CropError;
use crate::geometry::{Offset, PixelRect, Rect, Size, Transform, Velocity};
use crate::gesture::{pointers_inside, GestureEvent, GestureState, VelocityTracker};
use crate::hint::{grid_lines, CropHint, GridLine, HintVisibility};
use crate::state::{Axis, SavedTransform, TransformState};

/// Rule-of-thirds grid.
const GRID_DIVISIONS: u32 = 3;

/// State shared between the controller and its animation futures.
#[derive(Debug)]
struct Scene {
    transform: TransformState,
    container: Size,
    child: Size,
    /// Last geometry resolved while both sizes were known.
    geometry: CropGeometry,
}

impl Scene {
    fn new(transform: TransformState) -> Self {
        Self {
            transform,
            container: Size::ZERO,
            child: Size::ZERO,
            geometry: CropGeometry::default(),
        }
    }

    fn refresh_bounds(&mut self) {
        self.transform.update_bounds(self.child, self.container);
        self.refresh_geometry();
    }

    fn refresh_geometry(&mut self) {
        if let Some(geometry) =
            CropGeometry::resolve(self.container, self.child, &self.transform.transform())
        {
            self.geometry = geometry;
        }
    }
}

impl AnimationTarget for Scene {
    fn read(&self, channel: Channel) -> f32 {
        self.transform.read(channel)
    }

    fn write(&mut self, channel: Channel, value: f32) -> bool {
        let clamped = self.transform.write(channel, value);
        // Bounds follow the scale so joined translation channels clamp
        // against the extent the content has on this frame.
        if channel == Channel::Scale {
            self.transform.update_bounds(self.child, self.container);
        }
        self.refresh_geometry();
        clamped
    }
}

/// Interactive crop engine for one image.
///
/// The controller is single-threaded. Hosts call it from their UI thread:
/// size updates on layout, gesture entry points on input, and
/// [`on_frame`](Self::on_frame) once per display frame.
pub struct CropController<C: ImageCodec = PngCodec> {
    config: CropperConfig,
    scene: Rc<RefCell<Scene>>,
    clock: FrameClock,
    cancel: CancelScope,
    running: Option<LocalBoxFuture<'static, AnimationEnd>>,
    gesture: GestureState,
    velocity: VelocityTracker,
    hint: HintVisibility,
    image: Option<SourceImage>,
    original_size: Size,
    /// Set by restore so the first layout keeps the restored scale.
    keep_scale_on_layout: bool,
    codec: C,
}

impl CropController<PngCodec> {
    /// Create a controller that encodes crops as PNG.
    pub fn new(config: CropperConfig) -> Result<Self, CropError> {
        Self::with_codec(config, PngCodec)
    }

    /// Rebuild a PNG controller from a saved transform.
    pub fn restore(config: CropperConfig, saved: SavedTransform) -> Result<Self, CropError> {
        Self::restore_with_codec(config, saved, PngCodec)
    }
}

impl<C: ImageCodec> CropController<C> {
    pub fn with_codec(config: CropperConfig, codec: C) -> Result<Self, CropError> {
        config.validate()?;
        let transform = TransformState::new(config.min_scale, config.max_scale)?;
        Ok(Self::assemble(config, transform, codec))
    }

    /// Rebuild a controller from a saved transform.
    ///
    /// The saved scale limits replace the ones in `config`, and go through the
    /// same validation as construction.
    pub fn restore_with_codec(
        mut config: CropperConfig,
        saved: SavedTransform,
        codec: C,
    ) -> Result<Self, CropError> {
        let transform = saved.restore()?;
        config.min_scale = saved.min_scale;
        config.max_scale = saved.max_scale;
        config.validate()?;
        let mut controller = Self::assemble(config, transform, codec);
        controller.keep_scale_on_layout = true;
        Ok(controller)
    }

    fn assemble(config: CropperConfig, transform: TransformState, codec: C) -> Self {
        let hint = HintVisibility::new(config.hint_timeout_ms);
        Self {
            config,
            scene: Rc::new(RefCell::new(Scene::new(transform))),
            clock: FrameClock::new(),
            cancel: CancelScope::new(),
            running: None,
            gesture: GestureState::Idle,
            velocity: VelocityTracker::new(),
            hint,
            image: None,
            original_size: Size::ZERO,
            keep_scale_on_layout: false,
            codec,
        }
    }

    /// Capture the five scalars needed by [`restore`](CropController::restore).
    pub fn save(&self) -> SavedTransform {
        SavedTransform::capture(&self.scene.borrow().transform)
    }

    pub fn config(&self) -> &CropperConfig {
        &self.config
    }

    /// The clock animations run on. Advanced by [`on_frame`](Self::on_frame).
    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn update_container(&mut self, container: Size) {
        self.scene.borrow_mut().container = container;
        self.relayout();
    }

    pub fn update_child(&mut self, child: Size) {
        self.scene.borrow_mut().child = child;
        self.relayout();
    }

    pub fn update_container_and_child(&mut self, container: Size, child: Size) {
        {
            let mut scene = self.scene.borrow_mut();
            scene.container = container;
            scene.child = child;
        }
        self.relayout();
    }

    /// Switch the fit policy and re-apply its baseline.
    pub fn set_content_fit(&mut self, content_fit: ContentFit) {
        self.config.content_fit = content_fit;
        self.relayout();
    }

    /// Re-apply the content fit baseline and refresh bounds and geometry.
    fn relayout(&mut self) {
        let mut scene = self.scene.borrow_mut();
        let baseline = resolve_initial_scale(self.config.content_fit, scene.container, scene.child);
        match baseline {
            Some(scale) if self.keep_scale_on_layout => {
                debug!("Keeping restored scale instead of fit baseline {scale}");
                self.keep_scale_on_layout = false;
            }
            Some(scale) => scene.transform.set_scale(scale),
            None => {}
        }
        scene.refresh_bounds();
    }

    /// Hand over the full-resolution image that crops are taken from.
    ///
    /// Until the host reports a displayed child size, the image size is used.
    pub fn prepare_image(&mut self, image: SourceImage) {
        let size = image.size();
        info!("Prepared {}x{} source image", size.width, size.height);
        self.original_size = size;
        self.image = Some(image);
        self.hint.hide();

        let child_unknown = self.scene.borrow().child.is_empty();
        if child_unknown {
            self.update_child(size);
        }
    }

    pub fn transform(&self) -> Transform {
        self.scene.borrow().transform.transform()
    }

    pub fn scale(&self) -> f32 {
        self.scene.borrow().transform.scale()
    }

    /// Current translation bounds `(max_x, max_y)`.
    pub fn bounds(&self) -> (f32, f32) {
        self.scene.borrow().transform.bounds()
    }

    pub fn container_size(&self) -> Size {
        self.scene.borrow().container
    }

    pub fn child_size(&self) -> Size {
        self.scene.borrow().child
    }

    pub fn original_size(&self) -> Size {
        self.original_size
    }

    /// Hint window in container coordinates.
    ///
    /// Keeps its last value while sizes are unknown; [`Rect::ZERO`] before the
    /// first layout.
    pub fn crop_window(&self) -> Rect {
        self.scene.borrow().geometry.window
    }

    pub fn crop_geometry(&self) -> CropGeometry {
        self.scene.borrow().geometry
    }

    pub fn gesture_state(&self) -> GestureState {
        self.gesture
    }

    pub fn is_animating(&self) -> bool {
        self.running.is_some()
    }

    pub fn is_zooming(&self) -> bool {
        self.scene.borrow().transform.is_zooming()
    }

    pub fn hint_visible(&self) -> bool {
        self.config.hint.is_some() && self.hint.is_visible()
    }

    pub fn hint_style(&self) -> Option<CropHint> {
        self.config.hint
    }

    /// Grid lines to draw inside the crop window, local to its top-left.
    ///
    /// Empty when the hint is hidden or has no grid colour.
    pub fn grid_lines(&self) -> Vec<GridLine> {
        match self.config.hint {
            Some(CropHint {
                grid_line: Some(_), ..
            }) if self.hint.is_visible() => grid_lines(&self.crop_window(), GRID_DIVISIONS),
            _ => Vec::new(),
        }
    }

    pub fn is_horizontal_drag_finished(&self, dx: f32) -> bool {
        self.scene.borrow().transform.is_horizontal_drag_finished(dx)
    }

    pub fn is_vertical_drag_finished(&self, dy: f32) -> bool {
        self.scene.borrow().transform.is_vertical_drag_finished(dy)
    }

    /// Snap to `scale` (clamped) and refresh bounds.
    pub fn set_scale(&mut self, scale: f32) {
        self.scene.borrow_mut().transform.set_scale(scale);
        self.scene.borrow_mut().refresh_bounds();
    }

    /// Multiply the scale by `factor` and refresh bounds. Degenerate factors are ignored.
    pub fn zoom_by(&mut self, factor: f32) {
        self.scene.borrow_mut().transform.zoom_by(factor);
        self.scene.borrow_mut().refresh_bounds();
    }

    /// Translate within the current bounds.
    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        let mut scene = self.scene.borrow_mut();
        scene.transform.pan_by(dx, dy);
        scene.refresh_geometry();
    }

    pub fn on_drag_start(&mut self) {
        self.apply_event(GestureEvent::DragStart);
        self.velocity.reset();
    }

    /// Pan by `delta` and sample the pointer `position` for fling velocity.
    pub fn on_drag(&mut self, delta: Offset, time_ms: f64, position: Offset) {
        self.velocity.add_position(time_ms, position);
        self.pan_by(delta.x, delta.y);
        self.show_hint();
    }

    /// End a drag and fling with the tracked release velocity.
    pub fn on_drag_end(&mut self) {
        self.apply_event(GestureEvent::DragEnd);
        let velocity = self.velocity.velocity();
        self.velocity.reset();
        if velocity == Velocity::ZERO {
            return;
        }
        let fling = self.fling_after_drag_end(velocity);
        self.launch(fling);
    }

    /// Report the pointers currently down, in container coordinates.
    pub fn on_pointers(&mut self, pointers: &[Offset]) {
        let count = pointers_inside(self.container_size(), pointers);
        self.on_pointers_changed(count);
    }

    /// Report how many pointers are down inside the container.
    pub fn on_pointers_changed(&mut self, count: usize) {
        self.apply_event(GestureEvent::PointersChanged(count));
    }

    /// Apply one decoded pinch/pan event.
    ///
    /// The zoom is anchored at `focal` (container coordinates), so the content
    /// point under the fingers stays put while the scale changes. The pan is
    /// applied after bounds have been refreshed for the new scale.
    pub fn on_transform_gesture(&mut self, focal: Offset, pan: Offset, zoom: f32) {
        self.stop_animation();
        {
            let mut scene = self.scene.borrow_mut();
            let old_scale = scene.transform.scale();
            let translation = scene.transform.transform().translation();

            let (child, container) = (scene.child, scene.container);

            scene.transform.zoom_by(zoom);
            scene.transform.update_bounds(child, container);

            let new_scale = scene.transform.scale();
            let anchor = if old_scale > 0.0 && new_scale != old_scale {
                let center = container_center(container);
                (focal - center - translation) * (1.0 - new_scale / old_scale)
            } else {
                Offset::ZERO
            };
            let delta = pan + anchor;
            scene.transform.pan_by(delta.x, delta.y);
            scene.refresh_geometry();
        }
        self.show_hint();
    }

    /// Zoom to `target_scale` while moving the tapped point towards the centre.
    pub fn on_double_tap(&mut self, location: Offset, target_scale: f32) {
        self.apply_event(GestureEvent::DoubleTap(location));
        let center = container_center(self.container_size());
        let zoom = self.animate_focal_zoom_and_pan(target_scale, -(location - center));
        self.launch(zoom);
        self.show_hint();
    }

    fn apply_event(&mut self, event: GestureEvent) {
        if event.preempts_animation() {
            debug!("{event:?} interrupts animations");
            self.stop_animation();
        }
        self.gesture = self.gesture.transition(event);
    }

    /// Spring the scale to `target` (clamped), then refresh bounds.
    ///
    /// The returned future is driven by [`on_frame`](Self::on_frame) or
    /// [`crate::animation::drive`]. Starting it cancels any earlier animation.
    pub fn animate_scale_to(&mut self, target: f32) -> LocalBoxFuture<'static, AnimationEnd> {
        let token = self.preempt();
        let scene = Rc::clone(&self.scene);
        let clock = self.clock.clone();
        let spec = self.config.spring;
        let target = {
            let scene = scene.borrow();
            clamp_scale(&scene.transform, target)
        };

        async move {
            let end = spring_channel(
                Rc::clone(&scene),
                clock,
                token.clone(),
                Channel::Scale,
                target,
                spec,
                0.0,
            )
            .await;
            settle(&scene, &token, [end])
        }
        .boxed_local()
    }

    /// Spring scale and both translation axes together.
    ///
    /// `focal_delta` is added to the current translation to form the
    /// translation target. All three channels step on the same frames.
    pub fn animate_focal_zoom_and_pan(
        &mut self,
        target_scale: f32,
        focal_delta: Offset,
    ) -> LocalBoxFuture<'static, AnimationEnd> {
        let token = self.preempt();
        let scene = Rc::clone(&self.scene);
        let clock = self.clock.clone();
        let spec = self.config.spring;
        let (to_scale, to) = {
            let scene = scene.borrow();
            (
                clamp_scale(&scene.transform, target_scale),
                scene.transform.transform().translation() + focal_delta,
            )
        };

        async move {
            let spring = |channel, to| {
                spring_channel(
                    Rc::clone(&scene),
                    clock.clone(),
                    token.clone(),
                    channel,
                    to,
                    spec,
                    0.0,
                )
            };
            let (a, b, c) = join3(
                spring(Channel::Scale, to_scale),
                spring(Channel::Translate(Axis::X), to.x),
                spring(Channel::Translate(Axis::Y), to.y),
            )
            .await;
            settle(&scene, &token, [a, b, c])
        }
        .boxed_local()
    }

    /// Decay both translation axes from a release velocity.
    ///
    /// The velocity is divided by the configured fling divisor first. Each
    /// axis stops on its own when it reaches a bound.
    pub fn fling_after_drag_end(
        &mut self,
        velocity: Velocity,
    ) -> LocalBoxFuture<'static, AnimationEnd> {
        let token = self.preempt();
        let scene = Rc::clone(&self.scene);
        let clock = self.clock.clone();
        let spec = self.config.decay;
        let divisor = self.config.fling_velocity_divisor;
        let (vx, vy) = (velocity.x / divisor, velocity.y / divisor);

        async move {
            let decay = |axis, v| {
                decay_channel(
                    Rc::clone(&scene),
                    clock.clone(),
                    token.clone(),
                    Channel::Translate(axis),
                    v,
                    spec,
                )
            };
            let (a, b) = join(decay(Axis::X, vx), decay(Axis::Y, vy)).await;
            settle(&scene, &token, [a, b])
        }
        .boxed_local()
    }

    /// Start [`animate_scale_to`](Self::animate_scale_to) as the running
    /// animation, driven by [`on_frame`](Self::on_frame).
    pub fn launch_scale_to(&mut self, target: f32) {
        self.apply_event(GestureEvent::AnimationRequested);
        let animation = self.animate_scale_to(target);
        self.launch(animation);
    }

    /// Cancel whatever animation is running. The transform keeps its current values.
    ///
    /// This also cancels futures handed out by the async API that the caller
    /// drives itself; they resolve to [`AnimationEnd::Cancelled`] on their
    /// next frame without writing.
    pub fn stop_animation(&mut self) {
        self.running = None;
        self.cancel.cancel_all();
        self.gesture = self.gesture.transition(GestureEvent::AnimationFinished);
    }

    /// Store `animation` as the running one and register it with the clock.
    fn launch(&mut self, animation: LocalBoxFuture<'static, AnimationEnd>) {
        self.running = Some(animation);
        self.poll_running();
    }

    fn preempt(&mut self) -> CancelToken {
        self.running = None;
        self.cancel.renew()
    }

    fn poll_running(&mut self) {
        let Some(animation) = self.running.as_mut() else {
            return;
        };
        let mut cx = Context::from_waker(futures::task::noop_waker_ref());
        if let Poll::Ready(end) = animation.poll_unpin(&mut cx) {
            debug!("Animation ended: {end:?}");
            self.running = None;
            self.gesture = self.gesture.transition(GestureEvent::AnimationFinished);
        }
    }

    /// Advance to `time_ms`, step the running animation and the hint timer.
    ///
    /// Returns true while an animation is still running.
    pub fn on_frame(&mut self, time_ms: f64) -> bool {
        self.clock.advance(time_ms);
        self.poll_running();
        self.hint.tick(self.clock.frame_time_ms());
        self.running.is_some()
    }

    /// Produce frames at the configured interval until the running animation
    /// ends. Returns false if it is still running after `max_frames`.
    pub fn run_until_idle(&mut self, max_frames: usize) -> bool {
        for _ in 0..max_frames {
            if self.running.is_none() {
                return true;
            }
            let next = self.clock.frame_time_ms() + self.config.frame_interval_ms;
            self.on_frame(next);
        }
        self.running.is_none()
    }

    fn show_hint(&mut self) {
        self.hint.show(self.clock.frame_time_ms());
    }

    /// Pixel rectangle of the original image currently visible.
    ///
    /// Clipped to the image, which absorbs rounding when the displayed child
    /// is not an exact multiple of the source size.
    pub fn crop_rect(&self) -> Result<PixelRect, CropError> {
        if self.image.is_none() {
            return Err(CropError::NotReady("no image prepared"));
        }

        let scene = self.scene.borrow();
        if scene.child.width == 0 {
            return Err(CropError::NotReady("child width is zero"));
        }
        let transform = scene.transform.transform();
        let geometry = CropGeometry::resolve(scene.container, scene.child, &transform)
            .ok_or(CropError::NotReady("container size is unknown"))?;

        let rect = compute_image_pixel_rect(
            geometry.start_point,
            geometry.crop_area,
            transform.scale,
            self.original_size.width,
            scene.child.width,
        )?;
        Ok(clip_to(rect, self.original_size))
    }

    /// Encode the visible region of the original image.
    ///
    /// State is left untouched whether or not this succeeds.
    pub fn crop(&self) -> Result<Vec<u8>, CropError> {
        let rect = self.crop_rect()?;
        let image = self
            .image
            .as_ref()
            .ok_or(CropError::NotReady("no image prepared"))?;

        info!(
            "Cropping {}x{} at ({}, {}) from {}x{} source",
            rect.width,
            rect.height,
            rect.x,
            rect.y,
            image.width(),
            image.height()
        );
        self.codec.encode_region(image, rect).map_err(|e| {
            warn!("Crop encoding failed: {e}");
            CropError::from(e)
        })
    }
}

impl<C: ImageCodec> Drop for CropController<C> {
    fn drop(&mut self) {
        // Futures handed out by the async API may outlive the controller.
        self.cancel.cancel_all();
    }
}

impl<C: ImageCodec> fmt::Debug for CropController<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CropController")
            .field("config", &self.config)
            .field("scene", &self.scene)
            .field("gesture", &self.gesture)
            .field("animating", &self.running.is_some())
            .field("original_size", &self.original_size)
            .finish_non_exhaustive()
    }
}

fn container_center(container: Size) -> Offset {
    Offset::new(container.width as f32 / 2.0, container.height as f32 / 2.0)
}

fn clamp_scale(transform: &TransformState, target: f32) -> f32 {
    if target.is_nan() {
        return transform.scale();
    }
    target.clamp(transform.min_scale(), transform.max_scale())
}

fn clip_to(rect: PixelRect, size: Size) -> PixelRect {
    let x = rect.x.min(size.width);
    let y = rect.y.min(size.height);
    let width = rect.width.min(size.width - x);
    let height = rect.height.min(size.height - y);
    if (width, height) != (rect.width, rect.height) {
        debug!("Clipped crop rect {rect:?} to {width}x{height}");
    }
    PixelRect::new(x, y, width, height)
}

/// Combine channel results and, unless cancelled, refresh bounds for the final scale.
fn settle<const N: usize>(
    scene: &Rc<RefCell<Scene>>,
    token: &CancelToken,
    ends: [AnimationEnd; N],
) -> AnimationEnd {
    if token.is_cancelled() || ends.contains(&AnimationEnd::Cancelled) {
        return AnimationEnd::Cancelled;
    }
    scene.borrow_mut().refresh_bounds();
    if ends.contains(&AnimationEnd::BoundReached) {
        AnimationEnd::BoundReached
    } else {
        AnimationEnd::Finished
    }
}
