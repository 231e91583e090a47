use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::callback::FrameCallback;
use crate::time::{duration_nanos, MonotonicClock};

use super::queue::CallbackQueue;

/// Delayed-dispatch queue on the main loop.
///
/// Callbacks carry no vsync information on this path; each one is stamped with
/// the clock reading at the moment it is dispatched.
#[derive(Clone)]
pub struct Handler {
    queue: Rc<RefCell<CallbackQueue>>,
    clock: Rc<dyn MonotonicClock>,
}

impl Handler {
    pub(crate) fn new(clock: Rc<dyn MonotonicClock>) -> Self {
        Self {
            queue: Rc::new(RefCell::new(CallbackQueue::default())),
            clock,
        }
    }

    pub fn post(&self, callback: &FrameCallback) {
        self.post_delayed(callback, Duration::ZERO);
    }

    pub fn post_delayed(&self, callback: &FrameCallback, delay: Duration) {
        let due = self.clock.now_nanos().saturating_add(duration_nanos(delay));
        self.queue.borrow_mut().insert(due, callback.clone());
    }

    pub fn remove_callbacks(&self, callback: &FrameCallback) {
        self.queue.borrow_mut().remove(callback);
    }

    pub fn has_pending(&self, callback: &FrameCallback) -> bool {
        self.queue.borrow().contains(callback)
    }

    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    pub(crate) fn next_due(&self) -> Option<u64> {
        self.queue.borrow().next_due()
    }

    /// Runs every callback due now that was posted before this call.
    pub(crate) fn dispatch_due(&self) -> usize {
        let now = self.clock.now_nanos();
        let limit = self.queue.borrow().seq_mark();
        let mut ran = 0;
        loop {
            let next = self.queue.borrow_mut().pop_due(now, limit);
            let Some(callback) = next else {
                break;
            };
            callback.do_frame(self.clock.now_nanos());
            ran += 1;
        }
        ran
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::ManualClock;
    use std::cell::Cell;

    fn handler_at(start: u64) -> (ManualClock, Handler) {
        let clock = ManualClock::new(start);
        let handler = Handler::new(Rc::new(clock.clone()));
        (clock, handler)
    }

    #[test]
    fn delayed_callback_waits_for_its_due_time() {
        let (clock, handler) = handler_at(0);
        let fired = Rc::new(Cell::new(None));
        let sink = fired.clone();
        let cb = FrameCallback::new(move |t| sink.set(Some(t)));

        handler.post_delayed(&cb, Duration::from_millis(10));
        clock.advance(Duration::from_millis(9));
        assert_eq!(handler.dispatch_due(), 0);

        clock.advance(Duration::from_millis(2));
        assert_eq!(handler.dispatch_due(), 1);
        assert_eq!(fired.get(), Some(11_000_000));
    }

    #[test]
    fn removed_callback_never_runs() {
        let (clock, handler) = handler_at(0);
        let fired = Rc::new(Cell::new(false));
        let sink = fired.clone();
        let cb = FrameCallback::new(move |_| sink.set(true));

        handler.post(&cb);
        assert!(handler.has_pending(&cb));
        handler.remove_callbacks(&cb);
        clock.advance(Duration::from_millis(1));
        handler.dispatch_due();
        assert!(!fired.get());
    }

    #[test]
    fn reposting_from_a_callback_defers_to_the_next_turn() {
        let (_clock, handler) = handler_at(0);
        let runs = Rc::new(Cell::new(0));
        let slot: Rc<RefCell<Option<FrameCallback>>> = Rc::new(RefCell::new(None));
        let (r, s, h) = (runs.clone(), slot.clone(), handler.clone());
        let cb = FrameCallback::new(move |_| {
            r.set(r.get() + 1);
            if let Some(me) = s.borrow().as_ref() {
                h.post(me);
            }
        });
        *slot.borrow_mut() = Some(cb.clone());

        handler.post(&cb);
        assert_eq!(handler.dispatch_due(), 1);
        assert_eq!(runs.get(), 1);
        assert_eq!(handler.pending(), 1);

        slot.borrow_mut().take();
        handler.remove_callbacks(&cb);
    }
}
