//! Frame-driven interpolation tasks over a shared target.
//!
//! Each task animates one [`Channel`] of an [`AnimationTarget`] and awaits the
//! frame clock between steps. Tasks hold the target behind `Rc<RefCell<_>>`
//! and only borrow it while writing a frame, never across an await.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::animation::{DecaySpec, FrameClock, SpringSpec};
use crate::state::{Axis, TransformState};

/// One animatable scalar of the transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Scale,
    Translate(Axis),
}

/// Something whose channels can be read and written by animation tasks.
pub trait AnimationTarget {
    fn read(&self, channel: Channel) -> f32;

    /// Write a value. Returns true if the target clamped it.
    fn write(&mut self, channel: Channel, value: f32) -> bool;
}

impl AnimationTarget for TransformState {
    fn read(&self, channel: Channel) -> f32 {
        match channel {
            Channel::Scale => self.scale(),
            Channel::Translate(axis) => self.translation(axis),
        }
    }

    fn write(&mut self, channel: Channel, value: f32) -> bool {
        match channel {
            Channel::Scale => {
                self.set_scale(value);
                self.scale() != value
            }
            Channel::Translate(axis) => self.set_translation(axis, value),
        }
    }
}

/// How an animation task ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationEnd {
    /// Reached its target or came to rest.
    Finished,
    /// A value hit a bound and the motion stopped there.
    BoundReached,
    /// Superseded by a newer gesture or animation.
    Cancelled,
}

/// Generation counter shared between a controller and its animation tasks.
///
/// Bumping the generation cancels every task started before the bump; the
/// tasks notice on their next frame and stop writing.
#[derive(Debug, Clone, Default)]
pub struct CancelScope {
    generation: Rc<Cell<u64>>,
}

impl CancelScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel all outstanding tasks and return a token for new ones.
    pub fn renew(&self) -> CancelToken {
        self.generation.set(self.generation.get().wrapping_add(1));
        self.token()
    }

    /// Token for the current generation.
    pub fn token(&self) -> CancelToken {
        CancelToken {
            generation: Rc::clone(&self.generation),
            issued: self.generation.get(),
        }
    }

    pub fn cancel_all(&self) {
        self.renew();
    }
}

/// Handle a task checks to learn whether it was superseded.
#[derive(Debug, Clone)]
pub struct CancelToken {
    generation: Rc<Cell<u64>>,
    issued: u64,
}

impl CancelToken {
    pub fn is_cancelled(&self) -> bool {
        self.generation.get() != self.issued
    }
}

/// Spring `channel` of `target` to `to`.
pub async fn spring_channel<T: AnimationTarget>(
    target: Rc<RefCell<T>>,
    clock: FrameClock,
    token: CancelToken,
    channel: Channel,
    to: f32,
    spec: SpringSpec,
    initial_velocity: f32,
) -> AnimationEnd {
    let start_time = clock.next_frame().await;
    if token.is_cancelled() {
        return AnimationEnd::Cancelled;
    }
    let from = target.borrow().read(channel);
    let displacement = from - to;
    if spec.is_at_rest(displacement, initial_velocity) {
        target.borrow_mut().write(channel, to);
        return AnimationEnd::Finished;
    }

    loop {
        let now = clock.next_frame().await;
        if token.is_cancelled() {
            return AnimationEnd::Cancelled;
        }
        let elapsed = (now - start_time) / 1000.0;
        let (x, v) = spec.displacement_at(displacement, initial_velocity, elapsed);
        if spec.is_at_rest(x, v) {
            target.borrow_mut().write(channel, to);
            return AnimationEnd::Finished;
        }
        target.borrow_mut().write(channel, to + x);
    }
}

/// Decay `channel` of `target` from its current value with `velocity` (units/s).
///
/// Stops early when the target clamps a value, i.e. the motion ran into a bound.
pub async fn decay_channel<T: AnimationTarget>(
    target: Rc<RefCell<T>>,
    clock: FrameClock,
    token: CancelToken,
    channel: Channel,
    velocity: f32,
    spec: DecaySpec,
) -> AnimationEnd {
    let start_time = clock.next_frame().await;
    if token.is_cancelled() {
        return AnimationEnd::Cancelled;
    }
    let from = target.borrow().read(channel);
    let duration = spec.duration_secs(velocity);
    if duration <= 0.0 {
        return AnimationEnd::Finished;
    }

    loop {
        let now = clock.next_frame().await;
        if token.is_cancelled() {
            return AnimationEnd::Cancelled;
        }
        let elapsed = (now - start_time) / 1000.0;
        let value = spec.value_at(from, velocity, elapsed);
        if target.borrow_mut().write(channel, value) {
            return AnimationEnd::BoundReached;
        }
        if elapsed >= duration {
            return AnimationEnd::Finished;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::drive;
    use crate::geometry::Size;
    use futures::future::join;

    fn shared_state() -> Rc<RefCell<TransformState>> {
        let mut state = TransformState::new(1.0, 4.0).unwrap();
        state.set_scale(2.0);
        state.update_bounds(Size::new(300, 300), Size::new(300, 300));
        Rc::new(RefCell::new(state))
    }

    #[test]
    fn test_spring_reaches_target() {
        let clock = FrameClock::new();
        let state = shared_state();
        let scope = CancelScope::new();

        let task = spring_channel(
            Rc::clone(&state),
            clock.clone(),
            scope.token(),
            Channel::Scale,
            3.0,
            SpringSpec::default(),
            0.0,
        );
        assert_eq!(drive(&clock, task, 16.0, 600), Some(AnimationEnd::Finished));
        assert_eq!(state.borrow().scale(), 3.0);
    }

    #[test]
    fn test_spring_moves_gradually() {
        let clock = FrameClock::new();
        let state = shared_state();
        let scope = CancelScope::new();

        let task = spring_channel(
            Rc::clone(&state),
            clock.clone(),
            scope.token(),
            Channel::Translate(Axis::X),
            100.0,
            SpringSpec::default(),
            0.0,
        );
        // Two frames: the first only records the start time.
        assert_eq!(drive(&clock, task, 16.0, 2), None);
        let x = state.borrow().translate_x();
        assert!(x > 0.0 && x < 100.0, "x = {x}");
    }

    #[test]
    fn test_cancelled_task_stops_writing() {
        let clock = FrameClock::new();
        let state = shared_state();
        let scope = CancelScope::new();

        let token = scope.token();
        scope.cancel_all();
        let task = spring_channel(
            Rc::clone(&state),
            clock.clone(),
            token,
            Channel::Scale,
            4.0,
            SpringSpec::default(),
            0.0,
        );
        assert_eq!(drive(&clock, task, 16.0, 10), Some(AnimationEnd::Cancelled));
        assert_eq!(state.borrow().scale(), 2.0);
    }

    #[test]
    fn test_decay_stops_at_bound() {
        let clock = FrameClock::new();
        let state = shared_state();
        let scope = CancelScope::new();

        // Bounds are (150, 150); this fling would travel far past them.
        let task = decay_channel(
            Rc::clone(&state),
            clock.clone(),
            scope.token(),
            Channel::Translate(Axis::X),
            5000.0,
            DecaySpec::default(),
        );
        assert_eq!(
            drive(&clock, task, 16.0, 600),
            Some(AnimationEnd::BoundReached)
        );
        assert_eq!(state.borrow().translate_x(), 150.0);
    }

    #[test]
    fn test_decay_finishes_inside_bounds() {
        let clock = FrameClock::new();
        let state = shared_state();
        let scope = CancelScope::new();

        let task = decay_channel(
            Rc::clone(&state),
            clock.clone(),
            scope.token(),
            Channel::Translate(Axis::Y),
            -210.0,
            DecaySpec::default(),
        );
        assert_eq!(drive(&clock, task, 16.0, 600), Some(AnimationEnd::Finished));
        let y = state.borrow().translate_y();
        // Full travel is 210 / 4.2 = 50
        assert!(y < -49.0 && y > -50.0, "y = {y}");
    }

    #[test]
    fn test_joined_channels_progress_together() {
        let clock = FrameClock::new();
        let state = shared_state();
        let scope = CancelScope::new();

        let x = spring_channel(
            Rc::clone(&state),
            clock.clone(),
            scope.token(),
            Channel::Translate(Axis::X),
            100.0,
            SpringSpec::default(),
            0.0,
        );
        let y = spring_channel(
            Rc::clone(&state),
            clock.clone(),
            scope.token(),
            Channel::Translate(Axis::Y),
            100.0,
            SpringSpec::default(),
            0.0,
        );
        assert_eq!(drive(&clock, join(x, y), 16.0, 3), None);
        let s = state.borrow();
        assert!(s.translate_x() > 0.0);
        assert_eq!(s.translate_x(), s.translate_y());
    }
}
