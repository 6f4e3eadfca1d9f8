//! # quick-pipreqs
//!
//! Walks a directory tree, finds every directory holding a `requirements.txt`
//! and regenerates it with `pipreqs`, keeping the previous file as a `.bak`.
//!
//! ## Pipeline
//!
//! - **Scanner**: depth-limited discovery of marker directories
//! - **Processor**: backup, regenerate and hash-compare one directory
//! - **Parallel**: bounded worker pool with deterministic dispatch order
//! - **Progress**: shared state tracker drawn into a fixed terminal region
//!
//! ```bash
//! quick-pipreqs --max-depth 3 --concurrency 8 ./services
//! ```

pub mod cli;
pub mod config;
pub mod parallel;
pub mod processor;
pub mod progress;
pub mod scanner;
pub mod version;

pub use cli::{Cli, Output};
pub use config::Settings;

/// Result type alias for quick-pipreqs operations
pub type Result<T> = anyhow::Result<T>;

/// Hard upper bound on concurrently running regeneration commands
pub const MAX_CONCURRENCY: usize = 12;
