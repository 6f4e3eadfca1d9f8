//! Bounded parallel execution of directory regeneration
//!
//! # Responsibilities
//!
//! - **Admission**: at most `concurrency` directories run their external
//!   command at once, gated by a semaphore permit taken before each task is
//!   spawned
//! - **Ordering**: directories are dispatched in sorted path order; completion
//!   order is whatever the scheduler and the external tool produce
//! - **Isolation**: a failing directory is recorded and counted, it never
//!   aborts its siblings
//! - **Cancellation**: once the [`ShutdownSignal`] fires, tasks that have not
//!   started skip their work; running commands are left to finish
//!
//! ```rust,no_run
//! # async fn example(dirs: Vec<std::path::PathBuf>, processor: quick_pipreqs::processor::DirectoryProcessor) -> anyhow::Result<()> {
//! use quick_pipreqs::parallel::{ShutdownSignal, WorkerPool};
//! use quick_pipreqs::progress::ProgressTracker;
//! use std::sync::Arc;
//!
//! let tracker = Arc::new(ProgressTracker::new(&dirs, std::path::Path::new(".")));
//! let shutdown = ShutdownSignal::new();
//! let summary = WorkerPool::new(8)
//!     .run(dirs, Arc::new(processor), tracker, &shutdown)
//!     .await?;
//! println!("{}", summary.summary_line());
//! # Ok(())
//! # }
//! ```

mod pool;
mod shutdown;
mod stats;

pub use pool::{DirectoryFailure, RunSummary, WorkerPool, clamp_concurrency};
pub use shutdown::ShutdownSignal;
pub use stats::RunStats;
