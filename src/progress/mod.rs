//! Live progress display
//!
//! Workers move each directory through `Waiting -> Active -> Done` on a shared
//! [`ProgressTracker`]. A reporter task periodically takes a snapshot and hands
//! it to a [`Renderer`], which either redraws a fixed terminal region, logs a
//! line, or does nothing. Rendering never feeds back into processing.

mod render;
mod reporter;
mod tracker;

pub use render::{LogRenderer, Renderer, SilentRenderer, TerminalRenderer, renderer_for};
pub use reporter::spawn_reporter;
pub use tracker::{DirState, ProgressSnapshot, ProgressTracker};
