mod fallback;
mod precise;

use std::rc::Rc;
use std::time::Duration;

use crate::callback::FrameCallback;
use crate::host::MainLoop;

pub use fallback::{FallbackBackend, ONE_FRAME_MILLIS};
pub use precise::PreciseBackend;

/// Which delivery mechanism a scheduler ended up with.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BackendKind {
    Precise,
    Fallback,
}

impl BackendKind {
    pub fn name(self) -> &'static str {
        match self {
            BackendKind::Precise => "vsync",
            BackendKind::Fallback => "handler",
        }
    }
}

/// Host mechanism that turns a posting into a frame callback invocation.
pub trait SchedulingBackend {
    fn kind(&self) -> BackendKind;
    fn post(&self, callback: &FrameCallback);
    fn post_delayed(&self, callback: &FrameCallback, delay: Duration);
    fn remove(&self, callback: &FrameCallback);
}

/// Picks the backend from the host's capabilities. Called once per `MainLoop`.
pub fn select_backend(host: &MainLoop) -> Rc<dyn SchedulingBackend> {
    let capabilities = host.capabilities();
    let backend: Rc<dyn SchedulingBackend> = match host.choreographer() {
        Some(choreographer) if capabilities.precise_vsync => {
            Rc::new(PreciseBackend::new(choreographer.clone()))
        }
        _ => Rc::new(FallbackBackend::new(host.handler().clone())),
    };
    log::info!(
        "frame scheduler backend={} precise_vsync={}",
        backend.kind().name(),
        capabilities.precise_vsync
    );
    backend
}
