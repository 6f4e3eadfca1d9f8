use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::{ProgressTracker, Renderer};

/// Redraw `tracker` every `interval` until `shutdown` turns true (or its
/// sender is dropped), then render once more and release the display.
pub fn spawn_reporter(
    tracker: Arc<ProgressTracker>,
    mut renderer: Box<dyn Renderer>,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        renderer.begin();

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                _ = shutdown.wait_for(|stop| *stop) => break,
                _ = ticker.tick() => renderer.draw(&tracker.snapshot()),
            }
        }

        renderer.finish(&tracker.snapshot());
    })
}
