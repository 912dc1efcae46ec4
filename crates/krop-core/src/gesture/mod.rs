//! Gesture bookkeeping for the controller.
//!
//! Gesture *recognition* is the host's job. This module only models what the
//! controller needs from it: a small state machine over decoded events and a
//! velocity tracker for flings.

mod state;
mod velocity;

pub use state::{pointers_inside, GestureEvent, GestureState};
pub use velocity::{VelocityTracker, HORIZON_MS};
