//! Command-line interface for quick-pipreqs
//!
//! Parses flags with clap, merges them over the layered configuration and
//! drives scan -> worker pool -> summary.

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

mod output;

pub use output::Output;

use crate::config::{ConfigLoader, Settings};
use crate::parallel::{RunSummary, ShutdownSignal, WorkerPool, clamp_concurrency};
use crate::processor::{DirectoryProcessor, ExternalCommand};
use crate::progress::{ProgressTracker, renderer_for, spawn_reporter};
use crate::{scanner, version};

/// Regenerate every requirements.txt under a directory tree with pipreqs
#[derive(Parser, Debug)]
#[command(
    name = "quick-pipreqs",
    about = "Regenerate requirements.txt files across a directory tree with pipreqs",
    disable_version_flag = true
)]
pub struct Cli {
    /// Root directory to scan
    #[arg(value_name = "PATH")]
    pub root: Option<PathBuf>,

    /// Print actions without executing
    #[arg(long)]
    pub dry_run: bool,

    /// Maximum recursion depth (0 = only root, negative = unlimited) [default: 2]
    #[arg(long, value_name = "N", allow_negative_numbers = true)]
    pub max_depth: Option<i64>,

    /// Max concurrent updates (1-12, higher values are capped) [default: 12]
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(i64).range(1..))]
    pub concurrency: Option<i64>,

    /// Print the discovered directories before processing
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Use custom configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<String>,

    /// Print version and exit
    #[arg(long)]
    pub version: bool,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        if self.version {
            println!("{}", *version::FULL);
            return Ok(());
        }

        let Some(root) = self.root.clone() else {
            return Err(usage_error(
                ErrorKind::MissingRequiredArgument,
                "the following required argument was not provided: <PATH>",
            ));
        };

        setup_logging(self.verbose, self.quiet);
        let output = Output::new(self.verbose, self.quiet);

        let settings = self.resolve_settings()?;
        let concurrency = clamp_concurrency(settings.workers.concurrency).ok_or_else(|| {
            usage_error(
                ErrorKind::ValueValidation,
                &format!(
                    "invalid --concurrency: {} (must be >= 1)",
                    settings.workers.concurrency
                ),
            )
        })?;

        let root = scanner::resolve_root(&root)?;
        let mut dirs =
            scanner::find_marker_dirs(&root, settings.scan.depth_limit(), &settings.scan.marker)?;
        if dirs.is_empty() {
            output.line(&format!(
                "no {} found; running {} in root: {}",
                settings.scan.marker,
                settings.command.program,
                root.display()
            ));
            dirs.push(root.clone());
        }

        // Deterministic processing order
        scanner::sort_dirs(&mut dirs);

        output.info(&format!("discovered {} directories to process", dirs.len()));
        for dir in &dirs {
            output.verbose_item(&dir.display().to_string());
        }

        let command = ExternalCommand::from_settings(&settings.command);
        if !self.dry_run {
            let path = command.locate()?;
            tracing::debug!("using {}", path.display());
        }
        let processor = Arc::new(DirectoryProcessor::new(
            command,
            &settings.scan,
            self.dry_run,
        ));

        let summary = run_pool(&settings, &root, dirs, processor, concurrency, self.quiet).await?;
        report(&output, &root, &summary);
        Ok(())
    }

    /// Layered config with command-line flags applied on top
    fn resolve_settings(&self) -> Result<Settings> {
        let mut settings = ConfigLoader::load_with_custom_config(self.config.as_deref()).settings()?;
        if let Some(depth) = self.max_depth {
            settings.scan.max_depth = depth;
        }
        if let Some(concurrency) = self.concurrency {
            settings.workers.concurrency = concurrency;
        }
        Ok(settings)
    }
}

async fn run_pool(
    settings: &Settings,
    root: &std::path::Path,
    dirs: Vec<PathBuf>,
    processor: Arc<DirectoryProcessor>,
    concurrency: usize,
    quiet: bool,
) -> Result<RunSummary> {
    let tracker = Arc::new(ProgressTracker::new(&dirs, root));
    let shutdown = ShutdownSignal::new();

    let interrupt = {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("interrupted; directories not yet started will be skipped");
                shutdown.trigger();
            }
        })
    };

    // Logged before the reporter claims the terminal
    tracing::info!(
        "processing {} directories with {} workers{}",
        dirs.len(),
        concurrency,
        if processor.is_dry_run() { " (dry run)" } else { "" }
    );

    let reporter = spawn_reporter(
        tracker.clone(),
        renderer_for(quiet, settings.progress.active_lines),
        Duration::from_millis(settings.progress.interval_ms.max(1)),
        shutdown.subscribe(),
    );

    let result = WorkerPool::new(concurrency)
        .run(dirs, processor, tracker, &shutdown)
        .await;

    // Stop the reporter after its final render
    shutdown.trigger();
    interrupt.abort();
    if let Err(err) = reporter.await {
        tracing::warn!("progress reporter stopped abnormally: {}", err);
    }

    result.context("Worker pool failed")
}

/// Flush buffered per-directory failures, then the totals as the last line
fn report(output: &Output, root: &std::path::Path, summary: &RunSummary) {
    for failure in &summary.failures {
        let dir = failure
            .dir
            .strip_prefix(root)
            .ok()
            .filter(|rel| !rel.as_os_str().is_empty())
            .unwrap_or(failure.dir.as_path());
        let mut lines = failure.message.lines();
        output.error(&format!("{}: {}", dir.display(), lines.next().unwrap_or_default()));
        output.error_detail(&lines.collect::<Vec<_>>().join("\n"));
    }
    if summary.skipped > 0 {
        output.warning(&format!("skipped {} directories after interrupt", summary.skipped));
    }
    output.line(&summary.summary_line());
}

fn usage_error(kind: ErrorKind, message: &str) -> anyhow::Error {
    Cli::command().error(kind, message).into()
}

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return;
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            tracing_subscriber::EnvFilter::new("info,ignore=warn")
        } else {
            tracing_subscriber::EnvFilter::new("warn")
        }
    });

    // stderr keeps log lines out of the progress region on stdout
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
