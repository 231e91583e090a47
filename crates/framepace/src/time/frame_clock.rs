use std::time::Duration;

/// Per-tick timing snapshot derived from a delivered frame timestamp.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameTime {
    /// Time since the previous tick, in seconds (clamped).
    pub dt: f32,

    /// Timestamp delivered to the frame callback.
    pub frame_time_nanos: u64,

    /// Monotonic tick counter.
    pub frame_index: u64,

    /// Whole frame intervals that passed without a tick.
    pub skipped: u32,
}

/// Tracks consecutive frame timestamps and detects skipped frames.
///
/// One `FrameClock` per render loop. Feed it the timestamp each frame callback
/// receives; the first tick after construction or `reset` never reports skips.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Option<u64>,
    frame_index: u64,
    frame_interval: Duration,
    dt_max: Duration,
}

impl FrameClock {
    /// Creates a clock for a display refreshing every `frame_interval`.
    pub fn new(frame_interval: Duration) -> Self {
        Self::with_dt_max(frame_interval, Duration::from_millis(250))
    }

    /// Like `new`, with a custom upper clamp on `dt`.
    pub fn with_dt_max(frame_interval: Duration, dt_max: Duration) -> Self {
        Self {
            last: None,
            frame_index: 0,
            frame_interval,
            dt_max,
        }
    }

    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    /// Forgets the previous timestamp, e.g. after the loop was paused.
    pub fn reset(&mut self) {
        self.last = None;
    }

    /// Advances the clock to `frame_time_nanos`.
    pub fn tick(&mut self, frame_time_nanos: u64) -> FrameTime {
        let (elapsed, skipped) = match self.last {
            Some(last) => {
                let elapsed = frame_time_nanos.saturating_sub(last);
                (elapsed, skipped_frames(elapsed, self.frame_interval))
            }
            None => (0, 0),
        };

        self.last = Some(frame_time_nanos);

        let ft = FrameTime {
            dt: Duration::from_nanos(elapsed).min(self.dt_max).as_secs_f32(),
            frame_time_nanos,
            frame_index: self.frame_index,
            skipped,
        };

        self.frame_index = self.frame_index.wrapping_add(1);

        ft
    }
}

/// Number of intervals missed inside `elapsed`, rounding to the nearest interval.
fn skipped_frames(elapsed: u64, interval: Duration) -> u32 {
    let interval = u64::try_from(interval.as_nanos()).unwrap_or(u64::MAX);
    if interval == 0 {
        return 0;
    }
    let frames = elapsed.saturating_add(interval / 2) / interval;
    u32::try_from(frames.saturating_sub(1)).unwrap_or(u32::MAX)
}
