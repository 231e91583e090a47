use std::rc::Rc;
use std::time::Duration;

use crate::backend::{BackendKind, SchedulingBackend};
use crate::callback::FrameCallback;

/// Backend-agnostic entry point for posting frame callbacks.
///
/// Obtained from `MainLoop::frame_scheduler`; all clones share the one backend
/// chosen for the loop. Calls only register work, and delivery always happens
/// later on the loop's thread.
#[derive(Clone)]
pub struct FrameScheduler {
    backend: Rc<dyn SchedulingBackend>,
}

impl FrameScheduler {
    pub(crate) fn new(backend: Rc<dyn SchedulingBackend>) -> Self {
        Self { backend }
    }

    pub fn backend_kind(&self) -> BackendKind {
        self.backend.kind()
    }

    /// Whether both handles drive the same backend instance.
    pub fn same_as(&self, other: &FrameScheduler) -> bool {
        Rc::ptr_eq(&self.backend, &other.backend)
    }

    /// Delivers `callback` on the next available frame.
    pub fn post_frame_callback(&self, callback: &FrameCallback) {
        log::trace!("post {callback:?}");
        self.backend.post(callback);
    }

    /// Delivers `callback` on the first frame at least `delay_millis` from now.
    ///
    /// Negative delays are treated as zero.
    pub fn post_frame_callback_delayed(&self, callback: &FrameCallback, delay_millis: i64) {
        let delay = clamp_delay(delay_millis);
        log::trace!("post {callback:?} delay={delay:?}");
        self.backend.post_delayed(callback, delay);
    }

    /// Cancels every pending posting of `callback`. Unknown callbacks are ignored.
    ///
    /// A callback whose delivery has already begun still completes.
    pub fn remove_frame_callback(&self, callback: &FrameCallback) {
        log::trace!("remove {callback:?}");
        self.backend.remove(callback);
    }
}

fn clamp_delay(delay_millis: i64) -> Duration {
    match u64::try_from(delay_millis) {
        Ok(ms) => Duration::from_millis(ms),
        Err(_) => {
            log::trace!("negative frame delay {delay_millis}ms clamped to 0");
            Duration::ZERO
        }
    }
}
