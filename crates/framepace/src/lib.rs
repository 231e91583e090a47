//! framepace: display-synchronized frame callback scheduling.
//!
//! A `MainLoop` owns the host timing primitives and the single `FrameScheduler`
//! built from them. The scheduler delivers `FrameCallback`s through a vsync
//! choreographer when the host has one, and through a padded timer queue when it
//! does not. `DroppedFrameRecorder` accumulates skipped frames over a window.

pub mod backend;
pub mod callback;
pub mod config;
pub mod error;
pub mod host;
pub mod logging;
pub mod recorder;
pub mod scheduler;
pub mod time;

pub use backend::BackendKind;
pub use callback::FrameCallback;
pub use config::HostConfig;
pub use host::MainLoop;
pub use recorder::{DroppedFrameRecorder, DroppedFrames};
pub use scheduler::FrameScheduler;
