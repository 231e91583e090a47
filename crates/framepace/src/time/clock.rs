use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Monotonic nanosecond timeline shared by the host loop and both backends.
pub trait MonotonicClock {
    /// Nanoseconds elapsed since the clock's origin.
    fn now_nanos(&self) -> u64;

    /// Waits until the clock reads at least `deadline_nanos`.
    ///
    /// Real clocks sleep the calling thread; virtual clocks jump forward.
    fn wait_until(&self, deadline_nanos: u64);
}

/// Wall-clock backed monotonic clock.
#[derive(Debug, Copy, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock for SystemClock {
    fn now_nanos(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_nanos()).unwrap_or(u64::MAX)
    }

    fn wait_until(&self, deadline_nanos: u64) {
        let now = self.now_nanos();
        if deadline_nanos > now {
            std::thread::sleep(Duration::from_nanos(deadline_nanos - now));
        }
    }
}

/// Virtual clock for deterministic loops.
///
/// Clones share one timeline. Time only moves forward.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<u64>>,
}

impl ManualClock {
    pub fn new(start_nanos: u64) -> Self {
        Self {
            now: Rc::new(Cell::new(start_nanos)),
        }
    }

    /// Moves the clock to `nanos`; earlier values are ignored.
    pub fn set(&self, nanos: u64) {
        if nanos > self.now.get() {
            self.now.set(nanos);
        }
    }

    pub fn advance(&self, by: Duration) {
        self.set(self.now.get().saturating_add(duration_nanos(by)));
    }
}

impl MonotonicClock for ManualClock {
    fn now_nanos(&self) -> u64 {
        self.now.get()
    }

    fn wait_until(&self, deadline_nanos: u64) {
        self.set(deadline_nanos);
    }
}

/// Saturating conversion used wherever a `Duration` meets the nanosecond timeline.
pub fn duration_nanos(d: Duration) -> u64 {
    u64::try_from(d.as_nanos()).unwrap_or(u64::MAX)
}
