//! Styled terminal output for quick-pipreqs
//!
//! Everything the user is meant to read goes through [`Output`]; diagnostics
//! go through `tracing` to stderr instead.

use console::style;

/// Output handler for consistent CLI formatting
#[derive(Debug, Clone, Copy)]
pub struct Output {
    verbose: bool,
    quiet: bool,
}

impl Output {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    /// Print a plain line
    pub fn line(&self, message: &str) {
        if !self.quiet {
            println!("{message}");
        }
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        // Errors are always shown, even in quiet mode
        eprintln!("{} {}", style("✖").red(), message);
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("⚠").yellow(), message);
        }
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("ℹ").blue(), message);
        }
    }

    /// Print a list item, only in verbose mode
    pub fn verbose_item(&self, item: &str) {
        if self.verbose && !self.quiet {
            println!(" - {item}");
        }
    }

    /// Print an indented block to stderr, one line at a time
    pub fn error_detail(&self, detail: &str) {
        for line in detail.lines() {
            eprintln!("    {}", style(line).dim());
        }
    }
}
