//! Animation primitives: frame clock, spring and decay models, and the
//! interpolation tasks built on them.
//!
//! # Architecture
//!
//! Animations are plain futures. They never sleep or spawn; instead they
//! await [`FrameClock::next_frame`], and the host advances the clock once per
//! display frame. Joining several tasks (e.g. scale plus both translation
//! axes for a double tap) makes them step on exactly the same frames.
//!
//! Cancellation has two forms:
//! - Dropping a future stops it immediately
//! - Renewing a [`CancelScope`] makes tasks started earlier stop on their next frame

mod clock;
mod decay;
mod spring;
mod task;

pub use clock::{drive, FrameClock, NextFrame};
pub use decay::DecaySpec;
pub use spring::SpringSpec;
pub use task::{
    decay_channel, spring_channel, AnimationEnd, AnimationTarget, CancelScope, CancelToken,
    Channel,
};
