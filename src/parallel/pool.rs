use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Semaphore;

use super::{RunStats, ShutdownSignal};
use crate::MAX_CONCURRENCY;
use crate::processor::DirectoryProcessor;
use crate::progress::ProgressTracker;
use crate::scanner::sort_dirs;

/// Validate a requested pool size: below 1 is rejected, above the cap is
/// silently lowered to [`MAX_CONCURRENCY`].
pub fn clamp_concurrency(requested: i64) -> Option<usize> {
    if requested < 1 {
        return None;
    }
    Some(usize::try_from(requested).map_or(MAX_CONCURRENCY, |n| n.min(MAX_CONCURRENCY)))
}

/// A directory whose regeneration failed, with the captured diagnostics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryFailure {
    pub dir: PathBuf,
    pub message: String,
}

/// Totals for a finished run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub processed: usize,
    pub updated: usize,
    pub errors: usize,
    /// Directories never started because the run was cancelled
    pub skipped: usize,
    /// Sorted by directory
    pub failures: Vec<DirectoryFailure>,
}

impl RunSummary {
    pub fn summary_line(&self) -> String {
        format!(
            "processed: {} updated: {} errors: {}",
            self.processed, self.updated, self.errors
        )
    }
}

/// Runs the directory processor over many directories with bounded concurrency
#[derive(Debug, Clone)]
pub struct WorkerPool {
    concurrency: usize,
}

impl WorkerPool {
    /// `concurrency` is kept within `1..=MAX_CONCURRENCY`
    pub fn new(concurrency: usize) -> Self {
        Self {
            concurrency: concurrency.clamp(1, MAX_CONCURRENCY),
        }
    }

    #[cfg(test)]
    fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Process every directory once and wait for all of them.
    ///
    /// Dispatch follows sorted path order and blocks while `concurrency`
    /// tasks hold a permit. Per-directory failures end up in the summary;
    /// only a broken pool is returned as `Err`.
    pub async fn run(
        &self,
        mut dirs: Vec<PathBuf>,
        processor: Arc<DirectoryProcessor>,
        tracker: Arc<ProgressTracker>,
        shutdown: &ShutdownSignal,
    ) -> Result<RunSummary> {
        sort_dirs(&mut dirs);
        dirs.dedup();

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let stats = Arc::new(RunStats::new());
        let mut handles = Vec::with_capacity(dirs.len());

        tracing::debug!(
            "dispatching {} directories to {} workers{}",
            dirs.len(),
            self.concurrency,
            if processor.is_dry_run() { " (dry run)" } else { "" }
        );

        for dir in &dirs {
            let permit = semaphore
                .clone()
                .acquire_owned()
                .await
                .context("Worker pool semaphore closed")?;

            let task_dir = dir.clone();
            let processor = processor.clone();
            let tracker = tracker.clone();
            let stats = stats.clone();
            let shutdown = shutdown.clone();

            let handle = tokio::spawn(async move {
                let _permit = permit;
                let dir = task_dir;

                if shutdown.is_triggered() {
                    tracing::debug!("skipping {} (cancelled)", dir.display());
                    stats.increment_skipped();
                    return None;
                }

                tracker.start(&dir);
                let failure = match processor.process(&dir).await {
                    Ok(outcome) => {
                        if outcome.changed {
                            stats.increment_updated();
                        }
                        None
                    }
                    Err(err) => {
                        tracing::debug!("{} failed: {:#}", dir.display(), err);
                        stats.increment_errors();
                        Some(DirectoryFailure {
                            dir: dir.clone(),
                            message: format!("{err:#}"),
                        })
                    }
                };
                tracker.finish(&dir);
                failure
            });
            handles.push((dir.clone(), handle));
        }

        let mut failures = Vec::new();
        for (dir, handle) in handles {
            match handle.await {
                Ok(Some(failure)) => failures.push(failure),
                Ok(None) => {}
                Err(join_err) => {
                    // A panicking worker counts as a failed directory
                    stats.increment_errors();
                    failures.push(DirectoryFailure {
                        dir,
                        message: format!("worker task failed: {join_err}"),
                    });
                }
            }
        }

        let (updated, errors, skipped) = stats.get_counts();
        Ok(RunSummary {
            processed: dirs.len(),
            updated,
            errors,
            skipped,
            failures,
        })
    }
}
