use std::sync::atomic::{AtomicUsize, Ordering};

/// Run counters updated atomically across worker tasks
#[derive(Debug, Default)]
pub struct RunStats {
    pub updated: AtomicUsize,
    pub errors: AtomicUsize,
    pub skipped: AtomicUsize,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_updated(&self) {
        self.updated.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_errors(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_skipped(&self) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
    }

    /// (updated, errors, skipped)
    pub fn get_counts(&self) -> (usize, usize, usize) {
        (
            self.updated.load(Ordering::Relaxed),
            self.errors.load(Ordering::Relaxed),
            self.skipped.load(Ordering::Relaxed),
        )
    }
}
