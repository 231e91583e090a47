use std::time::Duration;

use crate::callback::FrameCallback;
use crate::host::Handler;

use super::{BackendKind, SchedulingBackend};

/// Nominal 60 Hz frame added to every delayed posting on the fallback path.
///
/// Without vsync alignment a delayed callback would land ahead of the display
/// refresh; one frame of padding keeps it from firing early.
pub const ONE_FRAME_MILLIS: u64 = 17;

/// Timer-queue backend for hosts without a vsync primitive.
pub struct FallbackBackend {
    handler: Handler,
}

impl FallbackBackend {
    pub fn new(handler: Handler) -> Self {
        Self { handler }
    }
}

impl SchedulingBackend for FallbackBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Fallback
    }

    fn post(&self, callback: &FrameCallback) {
        self.handler.post(callback);
    }

    fn post_delayed(&self, callback: &FrameCallback, delay: Duration) {
        let padded = delay.saturating_add(Duration::from_millis(ONE_FRAME_MILLIS));
        self.handler.post_delayed(callback, padded);
    }

    fn remove(&self, callback: &FrameCallback) {
        self.handler.remove_callbacks(callback);
    }
}
