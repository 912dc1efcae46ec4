//! Which gesture currently drives the transform.

use crate::geometry::{Offset, Size};

/// Active interaction mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    Dragging,
    PinchZooming,
    AnimatingProgrammatic,
}

/// Decoded input delivered by the host's gesture layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    DragStart,
    DragEnd,
    /// Number of contact points inside the container changed.
    PointersChanged(usize),
    DoubleTap(Offset),
    AnimationRequested,
    AnimationFinished,
}

impl GestureEvent {
    /// True for direct input that must interrupt any running animation.
    pub fn preempts_animation(&self) -> bool {
        match self {
            GestureEvent::DragStart => true,
            GestureEvent::PointersChanged(count) => *count >= 2,
            _ => false,
        }
    }
}

impl GestureState {
    /// Next state after `event`.
    pub fn transition(self, event: GestureEvent) -> GestureState {
        use GestureEvent as E;
        use GestureState as S;

        match (self, event) {
            (_, E::PointersChanged(count)) if count >= 2 => S::PinchZooming,
            (S::PinchZooming, E::PointersChanged(_)) => S::Idle,
            (S::PinchZooming, _) => S::PinchZooming,
            (_, E::DoubleTap(_)) | (_, E::AnimationRequested) => S::AnimatingProgrammatic,
            (S::Idle, E::DragStart) | (S::AnimatingProgrammatic, E::DragStart) => S::Dragging,
            (S::Dragging, E::DragEnd) => S::Idle,
            (S::AnimatingProgrammatic, E::AnimationFinished) => S::Idle,
            (state, _) => state,
        }
    }
}

/// Count the pointers that lie inside a container of `size`.
pub fn pointers_inside(container: Size, pointers: &[Offset]) -> usize {
    let (w, h) = (container.width as f32, container.height as f32);
    pointers
        .iter()
        .filter(|p| p.x >= 0.0 && p.y >= 0.0 && p.x <= w && p.y <= h)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    use GestureEvent as E;
    use GestureState as S;

    #[test]
    fn test_drag_cycle() {
        let state = S::Idle.transition(E::DragStart);
        assert_eq!(state, S::Dragging);
        assert_eq!(state.transition(E::DragEnd), S::Idle);
    }

    #[test]
    fn test_pinch_cycle() {
        let state = S::Idle.transition(E::PointersChanged(2));
        assert_eq!(state, S::PinchZooming);
        // Drag events are part of the pinch while two fingers are down.
        assert_eq!(state.transition(E::DragStart), S::PinchZooming);
        assert_eq!(state.transition(E::PointersChanged(1)), S::Idle);
    }

    #[test]
    fn test_drag_upgrades_to_pinch() {
        assert_eq!(
            S::Dragging.transition(E::PointersChanged(2)),
            S::PinchZooming
        );
    }

    #[test]
    fn test_double_tap_animates() {
        let state = S::Idle.transition(E::DoubleTap(Offset::new(10.0, 10.0)));
        assert_eq!(state, S::AnimatingProgrammatic);
        assert_eq!(state.transition(E::AnimationFinished), S::Idle);
    }

    #[test]
    fn test_new_gesture_interrupts_animation() {
        assert_eq!(
            S::AnimatingProgrammatic.transition(E::DragStart),
            S::Dragging
        );
        assert_eq!(
            S::AnimatingProgrammatic.transition(E::PointersChanged(3)),
            S::PinchZooming
        );
    }

    #[test]
    fn test_unrelated_events_keep_state() {
        assert_eq!(S::Idle.transition(E::DragEnd), S::Idle);
        assert_eq!(S::Idle.transition(E::AnimationFinished), S::Idle);
        assert_eq!(S::Dragging.transition(E::PointersChanged(1)), S::Dragging);
    }

    #[test]
    fn test_preempting_events() {
        assert!(E::DragStart.preempts_animation());
        assert!(E::PointersChanged(2).preempts_animation());
        assert!(!E::PointersChanged(1).preempts_animation());
        assert!(!E::DoubleTap(Offset::ZERO).preempts_animation());
    }

    #[test]
    fn test_pointers_inside_container() {
        let container = Size::new(100, 100);
        let pointers = [
            Offset::new(10.0, 10.0),
            Offset::new(150.0, 10.0),
            Offset::new(99.0, 100.0),
        ];
        assert_eq!(pointers_inside(container, &pointers), 2);
    }
}
