use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use framepace::time::{duration_nanos, FrameClock, MonotonicClock};
use framepace::{BackendKind, DroppedFrameRecorder, DroppedFrames, FrameCallback, FrameScheduler};

/// Injected overrun: every `every`-th frame blocks for `overrun`.
#[derive(Debug, Copy, Clone)]
pub struct Jank {
    pub every: u64,
    pub overrun: Duration,
}

impl Jank {
    pub const NONE: Jank = Jank {
        every: 0,
        overrun: Duration::ZERO,
    };
}

struct AnimatorState {
    frames: FrameClock,
    recorder: DroppedFrameRecorder,
    clock: Rc<dyn MonotonicClock>,
    jank: Jank,
    running: bool,
    ticks: u64,
    callback: Option<FrameCallback>,
}

impl AnimatorState {
    fn on_frame(&mut self, frame_time_nanos: u64) {
        let ft = self.frames.tick(frame_time_nanos);
        self.recorder.set_current_frame_nanos(frame_time_nanos);
        if ft.skipped > 0 {
            log::debug!("frame {} skipped {} interval(s)", ft.frame_index, ft.skipped);
            self.recorder.record_dropped(ft.skipped);
        }
        self.ticks += 1;

        if self.jank.every > 0 && ft.frame_index % self.jank.every == self.jank.every - 1 {
            let until = self
                .clock
                .now_nanos()
                .saturating_add(duration_nanos(self.jank.overrun));
            self.clock.wait_until(until);
        }
    }
}

/// Self-reposting frame loop standing in for an animation engine.
///
/// Each tick feeds the frame timestamp to a `FrameClock`, and every skipped
/// interval it finds goes to the `DroppedFrameRecorder`.
pub struct Animator {
    state: Rc<RefCell<AnimatorState>>,
    scheduler: FrameScheduler,
}

impl Animator {
    pub fn new(
        scheduler: FrameScheduler,
        clock: Rc<dyn MonotonicClock>,
        frame_interval: Duration,
        jank: Jank,
    ) -> Self {
        let state = Rc::new(RefCell::new(AnimatorState {
            frames: FrameClock::new(frame_interval),
            recorder: DroppedFrameRecorder::new(),
            clock,
            jank,
            running: false,
            ticks: 0,
            callback: None,
        }));

        let weak = Rc::downgrade(&state);
        let repost = scheduler.clone();
        let callback = FrameCallback::new(move |frame_time_nanos| {
            let Some(state) = weak.upgrade() else {
                return;
            };
            let next = {
                let mut state = state.borrow_mut();
                state.on_frame(frame_time_nanos);
                if state.running {
                    state.callback.clone()
                } else {
                    None
                }
            };
            let Some(next) = next else {
                return;
            };
            // A zero-delay handler post has no frame pacing; pad it by one frame.
            match repost.backend_kind() {
                BackendKind::Precise => repost.post_frame_callback(&next),
                BackendKind::Fallback => repost.post_frame_callback_delayed(&next, 0),
            }
        });
        state.borrow_mut().callback = Some(callback);

        Self { state, scheduler }
    }

    pub fn start(&self) {
        let callback = {
            let mut state = self.state.borrow_mut();
            if state.running {
                return;
            }
            state.running = true;
            state.frames.reset();
            state.callback.clone()
        };
        if let Some(callback) = callback {
            self.scheduler.post_frame_callback(&callback);
        }
    }

    pub fn stop(&self) {
        let callback = {
            let mut state = self.state.borrow_mut();
            state.running = false;
            state.callback.clone()
        };
        if let Some(callback) = callback {
            self.scheduler.remove_frame_callback(&callback);
        }
    }

    pub fn start_recording(&self) {
        self.state.borrow_mut().recorder.start();
    }

    pub fn stop_recording(&self) -> DroppedFrames {
        self.state.borrow_mut().recorder.stop()
    }

    pub fn ticks(&self) -> u64 {
        self.state.borrow().ticks
    }
}

impl Drop for Animator {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use framepace::time::ManualClock;
    use framepace::{HostConfig, MainLoop};

    fn host(vsync: bool) -> MainLoop {
        let config = HostConfig {
            refresh_hz: 100,
            vsync,
        };
        MainLoop::with_clock(&config, Rc::new(ManualClock::default()))
    }

    fn animator(main_loop: &MainLoop, jank: Jank) -> Animator {
        Animator::new(
            main_loop.frame_scheduler(),
            main_loop.clock().clone(),
            main_loop.frame_interval(),
            jank,
        )
    }

    #[test]
    fn steady_vsync_drops_nothing() {
        let main_loop = host(true);
        let anim = animator(&main_loop, Jank::NONE);
        anim.start();
        main_loop.run_for(Duration::from_millis(20));
        anim.start_recording();
        main_loop.run_for(Duration::from_millis(100));
        let report = anim.stop_recording();
        anim.stop();

        assert_eq!(report.count, 0);
        assert_eq!(report.duration(), Duration::from_millis(100));
    }

    #[test]
    fn overrunning_frames_are_recorded_as_drops() {
        let main_loop = host(true);
        let anim = animator(
            &main_loop,
            Jank {
                every: 5,
                overrun: Duration::from_millis(30),
            },
        );
        anim.start();
        anim.start_recording();
        main_loop.run_for(Duration::from_millis(200));
        let report = anim.stop_recording();
        anim.stop();

        assert!(report.count > 0);
        assert_eq!(report.count % 2, 0);
    }

    #[test]
    fn stop_cancels_the_pending_frame() {
        let main_loop = host(true);
        let anim = animator(&main_loop, Jank::NONE);
        anim.start();
        main_loop.run_for(Duration::from_millis(30));
        anim.stop();
        let ticks = anim.ticks();
        assert_eq!(main_loop.run_until_idle(), 0);
        assert_eq!(anim.ticks(), ticks);
    }

    #[test]
    fn fallback_host_repaces_at_one_frame() {
        let main_loop = host(false);
        let anim = animator(&main_loop, Jank::NONE);
        anim.start();
        anim.start_recording();
        main_loop.run_for(Duration::from_millis(100));
        let report = anim.stop_recording();
        anim.stop();

        // Ticks at 0, 17, 34, 51, 68, 85 ms.
        assert_eq!(anim.ticks(), 6);
        assert_eq!(report.count, 0);
        assert_eq!(report.duration(), Duration::from_millis(85));
    }

    #[test]
    fn fallback_host_still_ticks() {
        let main_loop = host(false);
        let anim = animator(&main_loop, Jank::NONE);
        anim.start();
        assert!(main_loop.run_once());
        anim.stop();
        assert_eq!(anim.ticks(), 1);
    }
}
