//! Frame scheduling contract.
//!
//! Propagation and resize recomputation never run inside the input handler
//! that triggered them. The core asks its scheduler for a frame and the host
//! calls back into [`GridScroll::run_frame`](crate::GridScroll::run_frame)
//! when it fires (`requestAnimationFrame` on the web, a timer or an explicit
//! call elsewhere).

use std::cell::Cell;
use std::rc::Rc;

pub trait FrameScheduler {
    /// Ask the host to run one frame. Not called again until that frame ran.
    fn request_frame(&mut self);

    /// Drop a pending request (teardown).
    fn cancel_frame(&mut self);

    /// Monotonic clock in milliseconds.
    fn now_ms(&self) -> f64;
}

#[derive(Debug, Default)]
struct ManualClock {
    pending: Cell<bool>,
    requests: Cell<u32>,
    now: Cell<f64>,
}

/// Scheduler driven by the caller: frames run when the host says so.
///
/// Clones share state, so a host can keep one clone to inspect and advance
/// the clock while the core owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    clock: Rc<ManualClock>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// A frame was requested and has not run yet.
    pub fn is_pending(&self) -> bool {
        self.clock.pending.get()
    }

    /// Total frames requested so far.
    pub fn requests(&self) -> u32 {
        self.clock.requests.get()
    }

    /// Mark the pending frame as fired. Returns whether one was pending.
    pub fn take_pending(&self) -> bool {
        self.clock.pending.replace(false)
    }

    pub fn advance(&self, ms: f64) {
        self.clock.now.set(self.clock.now.get() + ms);
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) {
        self.clock.pending.set(true);
        self.clock.requests.set(self.clock.requests.get() + 1);
    }

    fn cancel_frame(&mut self) {
        self.clock.pending.set(false);
    }

    fn now_ms(&self) -> f64 {
        self.clock.now.get()
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_state() {
        let observer = ManualScheduler::new();
        let mut owned = observer.clone();
        owned.request_frame();
        assert!(observer.is_pending());
        assert_eq!(observer.requests(), 1);
        assert!(observer.take_pending());
        assert!(!owned.clock.pending.get());

        observer.advance(16.0);
        assert_eq!(owned.now_ms(), 16.0);
    }

    #[test]
    fn test_cancel_clears_pending() {
        let mut scheduler = ManualScheduler::new();
        scheduler.request_frame();
        scheduler.cancel_frame();
        assert!(!scheduler.is_pending());
    }
}
