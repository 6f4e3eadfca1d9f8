//! External regeneration command.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use tokio::process::Command;

use crate::config::CommandSettings;

/// The regeneration tool, invoked once per directory
#[derive(Debug, Clone)]
pub struct ExternalCommand {
    program: String,
    args: Vec<String>,
}

/// Exit status plus everything the command printed
#[derive(Debug)]
pub struct CommandOutput {
    pub status: ExitStatus,
    /// stdout followed by stderr
    pub combined: Vec<u8>,
}

impl CommandOutput {
    pub fn combined_lossy(&self) -> String {
        String::from_utf8_lossy(&self.combined).into_owned()
    }
}

impl ExternalCommand {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn from_settings(settings: &CommandSettings) -> Self {
        Self::new(settings.program.clone(), settings.args.clone())
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Check the program is resolvable on PATH (or exists, for a path)
    pub fn locate(&self) -> Result<PathBuf> {
        which::which(&self.program).with_context(|| format!("{} not found in PATH", self.program))
    }

    /// Run in `dir` with the inherited environment, capturing all output
    pub async fn run_in(&self, dir: &Path) -> Result<CommandOutput> {
        tracing::debug!("running {} {:?} in {}", self.program, self.args, dir.display());

        let output = Command::new(&self.program)
            .args(&self.args)
            .current_dir(dir)
            .output()
            .await
            .with_context(|| format!("Failed to execute {}", self.program))?;

        let mut combined = output.stdout;
        combined.extend_from_slice(&output.stderr);

        Ok(CommandOutput {
            status: output.status,
            combined,
        })
    }
}
