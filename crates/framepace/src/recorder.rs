use std::time::Duration;

use crate::error::RecorderError;

/// Result of one dropped-frame measurement window.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct DroppedFrames {
    pub count: u32,
    pub duration_nanos: u64,
}

impl DroppedFrames {
    pub fn duration(&self) -> Duration {
        Duration::from_nanos(self.duration_nanos)
    }
}

impl From<DroppedFrames> for (u32, u64) {
    fn from(frames: DroppedFrames) -> Self {
        (frames.count, frames.duration_nanos)
    }
}

/// Counts frames a renderer reports as dropped between `start` and `stop`.
///
/// The recorder does not detect drops itself. Its owner feeds it the current
/// frame timestamp every tick and the number of frames it found skipped.
#[derive(Debug, Default, Clone)]
pub struct DroppedFrameRecorder {
    dropped: u32,
    window_start: Option<u64>,
    current_frame_nanos: u64,
}

impl DroppedFrameRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a window at the current frame timestamp. Restarts a running window.
    pub fn start(&mut self) {
        if self.window_start.is_some() {
            log::debug!("dropped-frame window restarted");
        }
        self.dropped = 0;
        self.window_start = Some(self.current_frame_nanos);
    }

    /// Closes the window and returns the count and its length.
    ///
    /// Without a matching `start` the duration is measured from zero.
    pub fn stop(&mut self) -> DroppedFrames {
        if self.window_start.is_none() {
            log::warn!("dropped-frame recorder stopped without start");
        }
        self.take_snapshot()
    }

    /// Like `stop`, but refuses an unpaired call.
    pub fn try_stop(&mut self) -> Result<DroppedFrames, RecorderError> {
        if self.window_start.is_none() {
            return Err(RecorderError::NotRecording);
        }
        Ok(self.take_snapshot())
    }

    pub fn is_recording(&self) -> bool {
        self.window_start.is_some()
    }

    pub fn record_dropped(&mut self, frames: u32) {
        self.dropped = self.dropped.saturating_add(frames);
    }

    pub fn dropped(&self) -> u32 {
        self.dropped
    }

    pub fn set_current_frame_nanos(&mut self, frame_time_nanos: u64) {
        self.current_frame_nanos = frame_time_nanos;
    }

    pub fn current_frame_nanos(&self) -> u64 {
        self.current_frame_nanos
    }

    fn take_snapshot(&mut self) -> DroppedFrames {
        let start = self.window_start.take().unwrap_or(0);
        let snapshot = DroppedFrames {
            count: self.dropped,
            duration_nanos: self.current_frame_nanos.saturating_sub(start),
        };
        self.dropped = 0;
        snapshot
    }
}
