use std::cell::OnceCell;
use std::rc::Rc;
use std::time::Duration;

use crate::backend::{select_backend, ONE_FRAME_MILLIS};
use crate::config::HostConfig;
use crate::scheduler::FrameScheduler;
use crate::time::{duration_nanos, MonotonicClock, SystemClock};

use super::choreographer::Choreographer;
use super::handler::Handler;

/// Static capabilities of the host, probed once when the scheduler is built.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct HostCapabilities {
    /// A vsync-aligned callback primitive is available.
    pub precise_vsync: bool,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Event {
    Task(u64),
    Vsync(u64),
}

impl Event {
    fn at(self) -> u64 {
        match self {
            Event::Task(at) | Event::Vsync(at) => at,
        }
    }
}

/// Single-threaded host loop owning the timing primitives.
///
/// The loop is the application root for frame scheduling: it owns the one
/// `FrameScheduler` of the process and dispatches every callback on the thread
/// that drives it.
pub struct MainLoop {
    clock: Rc<dyn MonotonicClock>,
    handler: Handler,
    choreographer: Option<Choreographer>,
    scheduler: OnceCell<FrameScheduler>,
}

impl MainLoop {
    /// Creates a loop on the system clock.
    pub fn new(config: &HostConfig) -> Self {
        Self::with_clock(config, Rc::new(SystemClock::new()))
    }

    pub fn with_clock(config: &HostConfig, clock: Rc<dyn MonotonicClock>) -> Self {
        let choreographer = config
            .vsync
            .then(|| Choreographer::new(clock.clone(), config.refresh_hz));
        log::debug!(
            "main loop created: vsync={} refresh_hz={}",
            config.vsync,
            config.refresh_hz
        );
        Self {
            handler: Handler::new(clock.clone()),
            choreographer,
            clock,
            scheduler: OnceCell::new(),
        }
    }

    pub fn capabilities(&self) -> HostCapabilities {
        HostCapabilities {
            precise_vsync: self.choreographer.is_some(),
        }
    }

    pub fn clock(&self) -> &Rc<dyn MonotonicClock> {
        &self.clock
    }

    pub fn handler(&self) -> &Handler {
        &self.handler
    }

    pub fn choreographer(&self) -> Option<&Choreographer> {
        self.choreographer.as_ref()
    }

    /// Nominal spacing of frame ticks: the vsync interval, or one fallback frame.
    pub fn frame_interval(&self) -> Duration {
        self.choreographer
            .as_ref()
            .map_or(Duration::from_millis(ONE_FRAME_MILLIS), Choreographer::frame_interval)
    }

    /// Returns the loop's frame scheduler, selecting its backend on first use.
    pub fn frame_scheduler(&self) -> FrameScheduler {
        self.scheduler
            .get_or_init(|| FrameScheduler::new(select_backend(self)))
            .clone()
    }

    /// Dispatches the next pending event, waiting for it if needed.
    ///
    /// Returns `false` when nothing is pending.
    pub fn run_once(&self) -> bool {
        match self.next_event() {
            Some(event) => {
                self.dispatch(event);
                true
            }
            None => false,
        }
    }

    /// Runs until no callback is pending on either primitive.
    ///
    /// Never returns while a callback keeps re-posting itself.
    pub fn run_until_idle(&self) -> usize {
        let mut turns = 0;
        while self.run_once() {
            turns += 1;
        }
        turns
    }

    /// Runs every event due within `duration`, then waits out the remainder.
    pub fn run_for(&self, duration: Duration) {
        let deadline = self.clock.now_nanos().saturating_add(duration_nanos(duration));
        while let Some(event) = self.next_event() {
            if event.at() > deadline {
                break;
            }
            self.dispatch(event);
        }
        self.clock.wait_until(deadline);
    }

    fn next_event(&self) -> Option<Event> {
        let task = self.handler.next_due();
        let vsync = self.choreographer.as_ref().and_then(Choreographer::next_vsync);
        match (task, vsync) {
            (Some(t), Some(v)) if v < t => Some(Event::Vsync(v)),
            (Some(t), _) => Some(Event::Task(t)),
            (None, Some(v)) => Some(Event::Vsync(v)),
            (None, None) => None,
        }
    }

    fn dispatch(&self, event: Event) {
        self.clock.wait_until(event.at());
        match event {
            Event::Task(_) => {
                let ran = self.handler.dispatch_due();
                log::trace!("handler turn ran {ran} callback(s)");
            }
            Event::Vsync(at) => {
                if let Some(choreographer) = &self.choreographer {
                    let ran = choreographer.do_frame(at);
                    log::trace!("vsync at {at}ns ran {ran} callback(s)");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BackendKind;
    use crate::time::ManualClock;

    fn host(vsync: bool) -> MainLoop {
        let config = HostConfig {
            refresh_hz: 100,
            vsync,
        };
        MainLoop::with_clock(&config, Rc::new(ManualClock::default()))
    }

    #[test]
    fn capabilities_follow_config() {
        assert!(host(true).capabilities().precise_vsync);
        assert!(!host(false).capabilities().precise_vsync);
    }

    #[test]
    fn scheduler_is_built_once() {
        let main_loop = host(true);
        let a = main_loop.frame_scheduler();
        let b = main_loop.frame_scheduler();
        assert!(a.same_as(&b));
        assert_eq!(a.backend_kind(), BackendKind::Precise);
    }

    #[test]
    fn frame_interval_matches_backend() {
        assert_eq!(host(true).frame_interval(), Duration::from_millis(10));
        assert_eq!(host(false).frame_interval(), Duration::from_millis(17));
    }

    #[test]
    fn idle_loop_runs_nothing() {
        let main_loop = host(true);
        assert!(!main_loop.run_once());
        assert_eq!(main_loop.run_until_idle(), 0);
    }

    #[test]
    fn run_for_advances_the_clock_to_its_deadline() {
        let main_loop = host(false);
        main_loop.run_for(Duration::from_millis(40));
        assert_eq!(main_loop.clock().now_nanos(), 40_000_000);
    }
}
