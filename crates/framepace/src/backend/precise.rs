use std::time::Duration;

use crate::callback::FrameCallback;
use crate::host::Choreographer;

use super::{BackendKind, SchedulingBackend};

/// Forwards straight to the vsync choreographer; callbacks get vsync timestamps.
pub struct PreciseBackend {
    choreographer: Choreographer,
}

impl PreciseBackend {
    pub fn new(choreographer: Choreographer) -> Self {
        Self { choreographer }
    }
}

impl SchedulingBackend for PreciseBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Precise
    }

    fn post(&self, callback: &FrameCallback) {
        self.choreographer.post_frame_callback(callback);
    }

    fn post_delayed(&self, callback: &FrameCallback, delay: Duration) {
        self.choreographer.post_frame_callback_delayed(callback, delay);
    }

    fn remove(&self, callback: &FrameCallback) {
        self.choreographer.remove_frame_callback(callback);
    }
}
