mod animator;
mod config;

use std::time::Duration;

use anyhow::{Context, Result};
use framepace::logging::{init_logging, LoggingConfig};
use framepace::{HostConfig, MainLoop};

use crate::animator::{Animator, Jank};
use crate::config::DemoConfig;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let host_config = HostConfig::from_env().context("invalid host configuration")?;
    let demo = DemoConfig::from_env().context("invalid demo configuration")?;

    let main_loop = MainLoop::new(&host_config);
    let interval = main_loop.frame_interval();
    let scheduler = main_loop.frame_scheduler();
    log::info!(
        "demo: backend={} interval={:?} seconds={} jank_every={}",
        scheduler.backend_kind().name(),
        interval,
        demo.seconds,
        demo.jank_every
    );

    let jank = if demo.jank_every == 0 {
        Jank::NONE
    } else {
        Jank {
            every: demo.jank_every,
            overrun: interval * demo.jank_frames,
        }
    };
    let animator = Animator::new(scheduler, main_loop.clock().clone(), interval, jank);

    animator.start();
    // Let the first frames settle before measuring.
    main_loop.run_for(interval * 2);

    animator.start_recording();
    main_loop.run_for(Duration::from_secs(demo.seconds));
    let report = animator.stop_recording();
    animator.stop();

    let ticks = animator.ticks();
    log::info!(
        "dropped {} frame(s) over {:.1} ms ({} ticks delivered)",
        report.count,
        report.duration().as_secs_f64() * 1000.0,
        ticks
    );
    Ok(())
}
