//! Host timing primitives.
//!
//! `MainLoop` is the single delivery thread. It owns two primitives:
//! - `Handler`: delayed dispatch, stamped with the clock at dispatch time
//! - `Choreographer`: vsync-aligned delivery, present only when the display offers it
//!
//! Everything here is `!Send`; callbacks always run on the loop's thread.

mod choreographer;
mod handler;
mod main_loop;
mod queue;

pub use choreographer::Choreographer;
pub use handler::Handler;
pub use main_loop::{HostCapabilities, MainLoop};
