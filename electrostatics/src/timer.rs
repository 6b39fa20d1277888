//! Deferred callbacks of the widgets
//!
//! Everything runs on the event loop thread. [`Timers`] holds one-shot delays
//! advanced by frame time, [`FrameHandle`] is the repeating per-frame redraw of
//! a mounted widget.

use std::cell::Cell;
use std::rc::Rc;

/// Identifies a scheduled one-shot timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

#[derive(Debug, Clone, Copy)]
struct PendingTimer {
    id: TimerId,
    remaining: f32,
}

/// One-shot timers driven by elapsed frame time
#[derive(Debug, Default, Clone)]
pub struct Timers {
    pending: Vec<PendingTimer>,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `id` to fire after `delay` seconds, replacing an earlier schedule of the same id
    pub fn schedule(&mut self, id: TimerId, delay: f32) {
        self.cancel(id);
        self.pending.push(PendingTimer {
            id,
            remaining: delay.max(0.0),
        });
    }

    /// Returns whether the timer was still pending
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|t| t.id != id);
        before != self.pending.len()
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.iter().any(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Let `dt` seconds pass. Returns the expired timers in scheduling order.
    pub fn advance(&mut self, dt: f32) -> Vec<TimerId> {
        let dt = dt.max(0.0);
        let mut fired = Vec::new();

        self.pending.retain_mut(|timer| {
            timer.remaining -= dt;
            if timer.remaining <= 0.0 {
                fired.push(timer.id);
                false
            } else {
                true
            }
        });

        fired
    }
}

/// Token of one requested redraw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRequest(u64);

/// Repeating redraw request of a mounted widget.
///
/// Every fired request immediately requests the next frame, until the handle is
/// cancelled or dropped with its widget.
#[derive(Debug)]
pub struct FrameHandle {
    name: &'static str,
    active: Rc<Cell<bool>>,
    pending: Option<FrameRequest>,
    next_request: u64,
    frames: u64,
}

impl FrameHandle {
    /// Start the loop with a first frame already requested
    pub fn start(name: &'static str) -> Self {
        log::debug!("{name}: redraw loop started");
        Self {
            name,
            active: Rc::new(Cell::new(true)),
            pending: Some(FrameRequest(0)),
            next_request: 1,
            frames: 0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    /// Read-only view of whether the loop is still running, valid after the
    /// handle is gone
    pub fn watch(&self) -> FrameWatch {
        FrameWatch(Rc::clone(&self.active))
    }

    pub fn pending(&self) -> Option<FrameRequest> {
        self.pending
    }

    /// Number of frames drawn so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Consume `request` if it is the outstanding one and queue the next frame.
    /// Returns false for cancelled or stale requests.
    pub fn fire(&mut self, request: FrameRequest) -> bool {
        if !self.is_active() || self.pending != Some(request) {
            return false;
        }
        self.frames += 1;
        self.pending = Some(self.request());
        true
    }

    /// Drop the outstanding request and queue a fresh one
    pub fn rearm(&mut self) {
        if self.is_active() {
            self.pending = Some(self.request());
        }
    }

    pub fn cancel(&mut self) {
        if self.is_active() {
            log::debug!("{}: redraw loop cancelled after {} frames", self.name, self.frames);
        }
        self.active.set(false);
        self.pending = None;
    }

    fn request(&mut self) -> FrameRequest {
        let request = FrameRequest(self.next_request);
        self.next_request += 1;
        request
    }
}

impl Drop for FrameHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Observer of a [`FrameHandle`]
#[derive(Debug, Clone)]
pub struct FrameWatch(Rc<Cell<bool>>);

impl FrameWatch {
    pub fn is_running(&self) -> bool {
        self.0.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_fires_after_exactly_its_delay() {
        let mut timers = Timers::new();
        timers.schedule(TimerId(1), 1.5);

        assert!(timers.advance(1.0).is_empty());
        assert!(timers.advance(0.25).is_empty());
        assert_eq!(timers.advance(0.25), vec![TimerId(1)]);
        assert!(timers.is_empty());
        assert!(timers.advance(10.0).is_empty());
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut timers = Timers::new();
        timers.schedule(TimerId(3), 0.5);
        assert!(timers.cancel(TimerId(3)));
        assert!(!timers.cancel(TimerId(3)));
        assert!(timers.advance(1.0).is_empty());
    }

    #[test]
    fn expired_timers_fire_in_order() {
        let mut timers = Timers::new();
        timers.schedule(TimerId(2), 0.2);
        timers.schedule(TimerId(1), 0.1);
        timers.schedule(TimerId(3), 5.0);

        assert_eq!(timers.advance(0.3), vec![TimerId(2), TimerId(1)]);
        assert!(timers.is_pending(TimerId(3)));
    }

    #[test]
    fn rescheduling_replaces_the_delay() {
        let mut timers = Timers::new();
        timers.schedule(TimerId(1), 0.1);
        timers.schedule(TimerId(1), 1.0);
        assert_eq!(timers.len(), 1);
        assert!(timers.advance(0.5).is_empty());
    }

    #[test]
    fn frame_loop_repeats() {
        let mut frames = FrameHandle::start("test");
        for _ in 0..3 {
            let request = frames.pending().expect("a frame is always requested");
            assert!(frames.fire(request));
        }
        assert_eq!(frames.frames(), 3);
    }

    #[test]
    fn stale_frame_request_is_ignored() {
        let mut frames = FrameHandle::start("test");
        let stale = frames.pending().expect("first frame requested");
        frames.rearm();

        assert!(!frames.fire(stale));
        let fresh = frames.pending().expect("rearmed");
        assert!(frames.fire(fresh));
    }

    #[test]
    fn cancelled_loop_stops() {
        let mut frames = FrameHandle::start("test");
        let request = frames.pending().expect("first frame requested");
        frames.cancel();

        assert!(!frames.is_active());
        assert!(!frames.fire(request));
        frames.rearm();
        assert_eq!(frames.pending(), None);
    }

    #[test]
    fn dropping_the_handle_stops_the_loop() {
        let frames = FrameHandle::start("test");
        let watch = frames.watch();
        assert!(watch.is_running());

        drop(frames);
        assert!(!watch.is_running());
    }
}
