//! Host-driven frame clock.
//!
//! Animation tasks await [`FrameClock::next_frame`] between steps. The host
//! calls [`FrameClock::advance`] once per display frame, which wakes every
//! task that is waiting. Tasks joined together therefore observe the same
//! frame timestamps and move in lockstep.

use std::cell::RefCell;
use std::future::Future;
use std::pin::{pin, Pin};
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

/// Single-threaded source of animation frames.
///
/// Cloning yields another handle to the same clock.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    inner: Rc<RefCell<ClockInner>>,
}

#[derive(Debug, Default)]
struct ClockInner {
    frame: u64,
    time_ms: f64,
    waiters: Vec<Waker>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Timestamp of the most recent frame, in milliseconds.
    pub fn frame_time_ms(&self) -> f64 {
        self.inner.borrow().time_ms
    }

    /// Number of frames produced so far.
    pub fn frame_count(&self) -> u64 {
        self.inner.borrow().frame
    }

    /// Produce a frame at `time_ms` and wake all waiting tasks.
    ///
    /// Time never runs backwards: an older timestamp repeats the current one.
    pub fn advance(&self, time_ms: f64) {
        let waiters = {
            let mut inner = self.inner.borrow_mut();
            inner.frame += 1;
            if time_ms.is_finite() && time_ms > inner.time_ms {
                inner.time_ms = time_ms;
            }
            std::mem::take(&mut inner.waiters)
        };
        // Wake outside the borrow; a waker may poll synchronously.
        for waker in waiters {
            waker.wake();
        }
    }

    /// Future resolving with the timestamp of the next frame.
    pub fn next_frame(&self) -> NextFrame {
        NextFrame {
            clock: self.clone(),
            target: self.frame_count() + 1,
        }
    }
}

/// Future returned by [`FrameClock::next_frame`].
#[derive(Debug)]
#[must_use = "futures do nothing unless awaited"]
pub struct NextFrame {
    clock: FrameClock,
    target: u64,
}

impl Future for NextFrame {
    type Output = f64;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<f64> {
        let mut inner = self.clock.inner.borrow_mut();
        if inner.frame >= self.target {
            return Poll::Ready(inner.time_ms);
        }
        if !inner.waiters.iter().any(|w| w.will_wake(cx.waker())) {
            inner.waiters.push(cx.waker().clone());
        }
        Poll::Pending
    }
}

/// Run `future` to completion by producing frames every `frame_interval_ms`.
///
/// Intended for headless hosts and tests. Returns `None` if the future has
/// not finished after `max_frames` frames.
pub fn drive<F: Future>(
    clock: &FrameClock,
    future: F,
    frame_interval_ms: f64,
    max_frames: usize,
) -> Option<F::Output> {
    let mut future = pin!(future);
    let mut cx = Context::from_waker(futures::task::noop_waker_ref());

    for _ in 0..=max_frames {
        if let Poll::Ready(output) = future.as_mut().poll(&mut cx) {
            return Some(output);
        }
        clock.advance(clock.frame_time_ms() + frame_interval_ms);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future::join;

    #[test]
    fn test_next_frame_waits_for_advance() {
        let clock = FrameClock::new();
        let mut frame = pin!(clock.next_frame());
        let mut cx = Context::from_waker(futures::task::noop_waker_ref());

        assert!(frame.as_mut().poll(&mut cx).is_pending());
        clock.advance(16.0);
        assert_eq!(frame.as_mut().poll(&mut cx), Poll::Ready(16.0));
    }

    #[test]
    fn test_time_is_monotonic() {
        let clock = FrameClock::new();
        clock.advance(100.0);
        clock.advance(50.0);
        assert_eq!(clock.frame_time_ms(), 100.0);
        assert_eq!(clock.frame_count(), 2);
    }

    #[test]
    fn test_drive_counts_frames() {
        let clock = FrameClock::new();
        let task = {
            let clock = clock.clone();
            async move {
                for _ in 0..5 {
                    clock.next_frame().await;
                }
                clock.frame_time_ms()
            }
        };
        assert_eq!(drive(&clock, task, 10.0, 100), Some(50.0));
    }

    #[test]
    fn test_drive_gives_up() {
        let clock = FrameClock::new();
        let task = futures::future::pending::<()>();
        assert_eq!(drive(&clock, task, 16.0, 10), None);
    }

    #[test]
    fn test_joined_tasks_share_frames() {
        let clock = FrameClock::new();
        let stamps = |clock: FrameClock| async move {
            let mut seen = Vec::new();
            for _ in 0..3 {
                seen.push(clock.next_frame().await);
            }
            seen
        };

        let (a, b) = drive(
            &clock,
            join(stamps(clock.clone()), stamps(clock.clone())),
            16.0,
            10,
        )
        .unwrap();
        assert_eq!(a, vec![16.0, 32.0, 48.0]);
        assert_eq!(a, b);
    }
}
