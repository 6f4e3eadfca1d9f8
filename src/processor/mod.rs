//! Single-directory regeneration
//!
//! Backs up the marker file, runs the external command in the directory and
//! compares digests to decide whether the marker actually changed. Each call
//! touches only the files of its own directory.

use anyhow::{Context, Result, anyhow};
use std::io;
use std::path::{Path, PathBuf};

mod command;
mod hash;

pub use command::{CommandOutput, ExternalCommand};
pub use hash::hash_file;

use crate::config::ScanSettings;

/// Per-directory outcome of a successful run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Outcome {
    pub changed: bool,
}

/// Marker state observed before or after regeneration
#[derive(Debug, Clone, PartialEq, Eq)]
struct Snapshot {
    exists: bool,
    digest: Option<String>,
}

impl Snapshot {
    fn missing() -> Self {
        Self {
            exists: false,
            digest: None,
        }
    }
}

/// Backs up and regenerates the marker file of one directory at a time
#[derive(Debug, Clone)]
pub struct DirectoryProcessor {
    command: ExternalCommand,
    marker: String,
    backup_name: String,
    dry_run: bool,
}

impl DirectoryProcessor {
    pub fn new(command: ExternalCommand, scan: &ScanSettings, dry_run: bool) -> Self {
        Self {
            command,
            marker: scan.marker.clone(),
            backup_name: scan.backup_name(),
            dry_run,
        }
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Regenerate the marker file in `dir`, once, without retry.
    ///
    /// A dry run touches nothing and reports unchanged. On command failure the
    /// original stays renamed to the backup name.
    pub async fn process(&self, dir: &Path) -> Result<Outcome> {
        if self.dry_run {
            tracing::debug!("dry run: would regenerate {}", dir.display());
            return Ok(Outcome::default());
        }

        let marker_path = dir.join(&self.marker);
        let backup_path = dir.join(&self.backup_name);

        let before = snapshot(&marker_path).await?;
        if before.exists {
            match tokio::fs::remove_file(&backup_path).await {
                Ok(()) => {}
                Err(err) if err.kind() == io::ErrorKind::NotFound => {}
                Err(err) => {
                    return Err(err)
                        .with_context(|| format!("Failed to remove {}", backup_path.display()));
                }
            }
            tokio::fs::rename(&marker_path, &backup_path)
                .await
                .with_context(|| {
                    format!(
                        "Failed to move {} to {}",
                        marker_path.display(),
                        backup_path.display()
                    )
                })?;
        }

        let output = self.command.run_in(dir).await?;
        if !output.status.success() {
            return Err(anyhow!(
                "{} failed: {}\n{}",
                self.command.program(),
                output.status,
                output.combined_lossy()
            ));
        }

        let after = snapshot(&marker_path).await?;
        let changed = is_changed(&before, &after);
        tracing::debug!("{} regenerated (changed: {})", dir.display(), changed);

        Ok(Outcome { changed })
    }
}

/// Changed iff the marker appeared, or existed on both sides with new content
fn is_changed(before: &Snapshot, after: &Snapshot) -> bool {
    match (before.exists, after.exists) {
        (false, true) => true,
        (true, true) => before.digest != after.digest,
        _ => false,
    }
}

async fn snapshot(path: &Path) -> Result<Snapshot> {
    match tokio::fs::metadata(path).await {
        Ok(_) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Snapshot::missing()),
        Err(err) => return Err(err).with_context(|| format!("Failed to stat {}", path.display())),
    }

    let owned: PathBuf = path.to_path_buf();
    let digest = tokio::task::spawn_blocking(move || hash_file(&owned))
        .await
        .context("Hashing task panicked")??;

    // The file may vanish between stat and open
    Ok(Snapshot {
        exists: digest.is_some(),
        digest,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use std::fs;
    use tempfile::TempDir;

    fn processor(script: &str, dry_run: bool) -> DirectoryProcessor {
        let command = ExternalCommand::new("sh", vec!["-c".to_string(), script.to_string()]);
        DirectoryProcessor::new(command, &Settings::default().scan, dry_run)
    }

    fn snap(exists: bool, digest: Option<&str>) -> Snapshot {
        Snapshot {
            exists,
            digest: digest.map(str::to_string),
        }
    }

    #[test]
    fn test_change_truth_table() {
        assert!(is_changed(&snap(false, None), &snap(true, Some("a"))));
        assert!(is_changed(&snap(true, Some("a")), &snap(true, Some("b"))));
        assert!(!is_changed(&snap(true, Some("a")), &snap(true, Some("a"))));
        assert!(!is_changed(&snap(true, Some("a")), &snap(false, None)));
        assert!(!is_changed(&snap(false, None), &snap(false, None)));
    }

    #[tokio::test]
    async fn test_dry_run_touches_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let marker = temp_dir.path().join("requirements.txt");
        fs::write(&marker, "flask\n").unwrap();

        // The command would fail if it ran
        let outcome = processor("exit 1", true).process(temp_dir.path()).await.unwrap();

        assert!(!outcome.changed);
        assert_eq!(fs::read_to_string(&marker).unwrap(), "flask\n");
        assert!(!temp_dir.path().join("requirements.txt.bak").exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_identical_output_is_unchanged_and_backed_up() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("requirements.txt"), "flask\n").unwrap();

        let outcome = processor("printf 'flask\\n' > requirements.txt", false)
            .process(temp_dir.path())
            .await
            .unwrap();

        assert!(!outcome.changed);
        assert_eq!(
            fs::read_to_string(temp_dir.path().join("requirements.txt.bak")).unwrap(),
            "flask\n"
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_new_content_is_changed() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("requirements.txt"), "flask\n").unwrap();

        let outcome = processor("printf 'django\\n' > requirements.txt", false)
            .process(temp_dir.path())
            .await
            .unwrap();

        assert!(outcome.changed);
        assert_eq!(
            fs::read_to_string(temp_dir.path().join("requirements.txt")).unwrap(),
            "django\n"
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_created_marker_is_changed() {
        let temp_dir = TempDir::new().unwrap();

        let outcome = processor("printf 'numpy\\n' > requirements.txt", false)
            .process(temp_dir.path())
            .await
            .unwrap();

        assert!(outcome.changed);
        assert!(!temp_dir.path().join("requirements.txt.bak").exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_marker_not_recreated_is_unchanged() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("requirements.txt"), "flask\n").unwrap();

        let outcome = processor("true", false).process(temp_dir.path()).await.unwrap();

        assert!(!outcome.changed);
        assert!(!temp_dir.path().join("requirements.txt").exists());
        assert!(temp_dir.path().join("requirements.txt.bak").exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_existing_backup_is_replaced() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("requirements.txt"), "new\n").unwrap();
        fs::write(temp_dir.path().join("requirements.txt.bak"), "stale\n").unwrap();

        processor("printf 'new\\n' > requirements.txt", false)
            .process(temp_dir.path())
            .await
            .unwrap();

        assert_eq!(
            fs::read_to_string(temp_dir.path().join("requirements.txt.bak")).unwrap(),
            "new\n"
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failure_keeps_backup_and_carries_output() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("requirements.txt"), "flask\n").unwrap();

        let err = processor("echo 'SyntaxError in app.py'; exit 2", false)
            .process(temp_dir.path())
            .await
            .unwrap_err();

        assert!(err.to_string().contains("SyntaxError in app.py"));
        assert!(!temp_dir.path().join("requirements.txt").exists());
        assert_eq!(
            fs::read_to_string(temp_dir.path().join("requirements.txt.bak")).unwrap(),
            "flask\n"
        );
    }
}
