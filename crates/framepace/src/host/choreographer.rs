use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::callback::FrameCallback;
use crate::time::{duration_nanos, MonotonicClock};

use super::queue::CallbackQueue;

#[derive(Debug, Default)]
struct ChoreographerState {
    queue: CallbackQueue,
    last_vsync: Option<u64>,
}

/// Vsync-aligned frame callback source.
///
/// Vsync pulses fall on integer multiples of the frame interval on the clock's
/// timeline. A pulse is only requested while callbacks are pending, and every
/// callback of a pulse receives that pulse's timestamp.
#[derive(Clone)]
pub struct Choreographer {
    state: Rc<RefCell<ChoreographerState>>,
    clock: Rc<dyn MonotonicClock>,
    frame_interval_nanos: u64,
}

impl Choreographer {
    pub(crate) fn new(clock: Rc<dyn MonotonicClock>, refresh_hz: u32) -> Self {
        Self {
            state: Rc::new(RefCell::new(ChoreographerState::default())),
            clock,
            frame_interval_nanos: (1_000_000_000 / u64::from(refresh_hz.max(1))).max(1),
        }
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_nanos(self.frame_interval_nanos)
    }

    pub fn post_frame_callback(&self, callback: &FrameCallback) {
        self.post_frame_callback_delayed(callback, Duration::ZERO);
    }

    /// Runs `callback` on the first vsync at or after `delay` from now.
    pub fn post_frame_callback_delayed(&self, callback: &FrameCallback, delay: Duration) {
        let due = self.clock.now_nanos().saturating_add(duration_nanos(delay));
        self.state.borrow_mut().queue.insert(due, callback.clone());
    }

    pub fn remove_frame_callback(&self, callback: &FrameCallback) {
        self.state.borrow_mut().queue.remove(callback);
    }

    pub fn has_pending(&self, callback: &FrameCallback) -> bool {
        self.state.borrow().queue.contains(callback)
    }

    /// Timestamp of the vsync that will serve the earliest pending callback.
    pub(crate) fn next_vsync(&self) -> Option<u64> {
        let state = self.state.borrow();
        let due = state.queue.next_due()?;
        let interval = self.frame_interval_nanos;

        let target = due.max(self.clock.now_nanos());
        let mut vsync = target.div_ceil(interval).saturating_mul(interval);
        if let Some(last) = state.last_vsync {
            if vsync <= last {
                vsync = last.saturating_add(interval);
            }
        }
        Some(vsync)
    }

    /// Delivers the vsync at `frame_time_nanos` to every callback it serves.
    ///
    /// Callbacks posted while the pulse is being delivered wait for a later one.
    pub(crate) fn do_frame(&self, frame_time_nanos: u64) -> usize {
        let limit = {
            let mut state = self.state.borrow_mut();
            state.last_vsync = Some(frame_time_nanos);
            state.queue.seq_mark()
        };

        let mut ran = 0;
        loop {
            let next = self
                .state
                .borrow_mut()
                .queue
                .pop_due(frame_time_nanos, limit);
            let Some(callback) = next else {
                break;
            };
            callback.do_frame(frame_time_nanos);
            ran += 1;
        }
        ran
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::ManualClock;

    const HZ: u32 = 100;
    const TEN_MS: u64 = 10_000_000;

    fn choreographer_at(start: u64) -> (ManualClock, Choreographer) {
        let clock = ManualClock::new(start);
        let ch = Choreographer::new(Rc::new(clock.clone()), HZ);
        (clock, ch)
    }

    #[test]
    fn idle_choreographer_requests_no_vsync() {
        let (_clock, ch) = choreographer_at(0);
        assert_eq!(ch.next_vsync(), None);
    }

    #[test]
    fn post_aligns_to_next_boundary() {
        let (_clock, ch) = choreographer_at(3_000_000);
        ch.post_frame_callback(&FrameCallback::new(|_| {}));
        assert_eq!(ch.next_vsync(), Some(TEN_MS));
    }

    #[test]
    fn delay_pushes_past_intermediate_boundaries() {
        let (_clock, ch) = choreographer_at(0);
        ch.post_frame_callback_delayed(&FrameCallback::new(|_| {}), Duration::from_millis(25));
        assert_eq!(ch.next_vsync(), Some(3 * TEN_MS));
    }

    #[test]
    fn same_boundary_is_never_delivered_twice() {
        let (_clock, ch) = choreographer_at(TEN_MS);
        ch.do_frame(TEN_MS);
        ch.post_frame_callback(&FrameCallback::new(|_| {}));
        assert_eq!(ch.next_vsync(), Some(2 * TEN_MS));
    }

    #[test]
    fn absurd_refresh_rate_keeps_a_nonzero_interval() {
        let clock = ManualClock::new(7);
        let ch = Choreographer::new(Rc::new(clock), u32::MAX);
        assert_eq!(ch.frame_interval(), Duration::from_nanos(1));
        ch.post_frame_callback(&FrameCallback::new(|_| {}));
        assert_eq!(ch.next_vsync(), Some(7));
    }

    #[test]
    fn callbacks_receive_the_vsync_timestamp() {
        let (clock, ch) = choreographer_at(0);
        let seen = Rc::new(RefCell::new(Vec::new()));
        for _ in 0..2 {
            let sink = seen.clone();
            ch.post_frame_callback(&FrameCallback::new(move |t| sink.borrow_mut().push(t)));
        }
        clock.wait_until(TEN_MS + 1);
        assert_eq!(ch.do_frame(TEN_MS), 2);
        assert_eq!(*seen.borrow(), vec![TEN_MS, TEN_MS]);
    }
}
