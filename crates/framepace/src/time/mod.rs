//! Time subsystem.
//!
//! - `MonotonicClock` is the nanosecond timeline the host loop dispatches on
//! - `FrameClock` turns delivered frame timestamps into `FrameTime` snapshots and
//!   counts skipped intervals for dropped-frame accounting

mod clock;
mod frame_clock;

pub use clock::{duration_nanos, ManualClock, MonotonicClock, SystemClock};
pub use frame_clock::{FrameClock, FrameTime};
