//! Configuration management for quick-pipreqs
//!
//! Settings are layered with figment: embedded defaults, then user and project
//! config files, then `QUICK_PIPREQS_*` environment variables. Command-line
//! flags are applied on top by the CLI.

use serde::{Deserialize, Serialize};

mod core;

pub use core::ConfigLoader;

/// Fully merged settings for one run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    pub scan: ScanSettings,
    pub command: CommandSettings,
    pub workers: WorkerSettings,
    pub progress: ProgressSettings,
}

/// Discovery settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScanSettings {
    /// Marker file name, matched case-insensitively
    pub marker: String,

    /// Suffix appended to the marker name for the backup copy
    pub backup_suffix: String,

    /// Depth limit; negative disables it
    pub max_depth: i64,
}

/// External regeneration command
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommandSettings {
    /// Executable, looked up on PATH unless it contains a separator
    pub program: String,

    /// Fixed argument set
    #[serde(default)]
    pub args: Vec<String>,
}

/// Worker pool settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkerSettings {
    /// Requested pool size, before clamping
    pub concurrency: i64,
}

/// Live progress display settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProgressSettings {
    /// Redraw period in milliseconds
    pub interval_ms: u64,

    /// Number of active-directory lines in the reserved region
    pub active_lines: usize,
}

impl ScanSettings {
    /// `None` means unlimited depth
    pub fn depth_limit(&self) -> Option<usize> {
        usize::try_from(self.max_depth).ok()
    }

    pub fn backup_name(&self) -> String {
        format!("{}{}", self.marker, self.backup_suffix)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            scan: ScanSettings {
                marker: "requirements.txt".to_string(),
                backup_suffix: ".bak".to_string(),
                max_depth: 2,
            },
            command: CommandSettings {
                program: "pipreqs".to_string(),
                args: vec![".".to_string()],
            },
            workers: WorkerSettings { concurrency: 12 },
            progress: ProgressSettings {
                interval_ms: 200,
                active_lines: 6,
            },
        }
    }
}
