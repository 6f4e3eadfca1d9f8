use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Lifecycle of one discovered directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirState {
    Waiting,
    Active,
    Done,
}

/// Point-in-time view of the tracker, detached from the lock
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressSnapshot {
    pub waiting: usize,
    pub active: usize,
    pub done: usize,
    /// Active directories relative to the root, sorted
    pub active_dirs: Vec<String>,
}

impl ProgressSnapshot {
    #[cfg(test)]
    fn total(&self) -> usize {
        self.waiting + self.active + self.done
    }

    pub fn summary_line(&self) -> String {
        format!(
            "[ {}: Waiting, {} Active, {} Done ]",
            self.waiting, self.active, self.done
        )
    }
}

/// Shared state of every directory in the run.
///
/// Every directory registered at construction has exactly one state, and
/// only moves forward: `Waiting -> Active -> Done`.
#[derive(Debug)]
pub struct ProgressTracker {
    states: Mutex<HashMap<PathBuf, DirState>>,
    root: PathBuf,
}

impl ProgressTracker {
    pub fn new(dirs: &[PathBuf], root: &Path) -> Self {
        let states = dirs
            .iter()
            .map(|dir| (dir.clone(), DirState::Waiting))
            .collect();
        Self {
            states: Mutex::new(states),
            root: root.to_path_buf(),
        }
    }

    /// `Waiting -> Active`; returns false if the transition is not allowed
    pub fn start(&self, dir: &Path) -> bool {
        self.transition(dir, DirState::Waiting, DirState::Active)
    }

    /// `Active -> Done`; returns false if the transition is not allowed
    pub fn finish(&self, dir: &Path) -> bool {
        self.transition(dir, DirState::Active, DirState::Done)
    }

    #[cfg(test)]
    fn state(&self, dir: &Path) -> Option<DirState> {
        self.lock().get(dir).copied()
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        let mut snapshot = ProgressSnapshot::default();
        let mut active = Vec::new();
        {
            let states = self.lock();
            for (dir, state) in states.iter() {
                match state {
                    DirState::Waiting => snapshot.waiting += 1,
                    DirState::Active => {
                        snapshot.active += 1;
                        active.push(dir.clone());
                    }
                    DirState::Done => snapshot.done += 1,
                }
            }
        }

        active.sort();
        snapshot.active_dirs = active.iter().map(|dir| self.display_path(dir)).collect();
        snapshot
    }

    /// Path relative to the root, falling back to the full path
    pub fn display_path(&self, dir: &Path) -> String {
        match dir.strip_prefix(&self.root) {
            Ok(rel) if rel.as_os_str().is_empty() => ".".to_string(),
            Ok(rel) => rel.display().to_string(),
            Err(_) => dir.display().to_string(),
        }
    }

    fn transition(&self, dir: &Path, from: DirState, to: DirState) -> bool {
        let rejected = {
            let mut states = self.lock();
            match states.get_mut(dir) {
                Some(state) if *state == from => {
                    *state = to;
                    None
                }
                current => Some(current.map(|s| *s)),
            }
        };

        match rejected {
            None => true,
            Some(current) => {
                tracing::warn!(
                    "ignoring progress transition {:?} -> {:?} for {} (currently {:?})",
                    from,
                    to,
                    dir.display(),
                    current
                );
                false
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<PathBuf, DirState>> {
        // The map is never left half-updated, so a poisoned lock is still usable
        self.states.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn dirs(root: &Path, names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(|n| root.join(n)).collect()
    }

    #[test]
    fn test_all_dirs_start_waiting() {
        let root = Path::new("/work");
        let tracker = ProgressTracker::new(&dirs(root, &["a", "b", "c"]), root);

        let snapshot = tracker.snapshot();
        assert_eq!((snapshot.waiting, snapshot.active, snapshot.done), (3, 0, 0));
        assert!(snapshot.active_dirs.is_empty());
    }

    #[test]
    fn test_forward_transitions() {
        let root = Path::new("/work");
        let tracker = ProgressTracker::new(&dirs(root, &["a", "b"]), root);
        let a = root.join("a");

        assert!(tracker.start(&a));
        assert_eq!(tracker.state(&a), Some(DirState::Active));
        let snapshot = tracker.snapshot();
        assert_eq!((snapshot.waiting, snapshot.active, snapshot.done), (1, 1, 0));
        assert_eq!(snapshot.active_dirs, vec!["a"]);

        assert!(tracker.finish(&a));
        assert_eq!(tracker.state(&a), Some(DirState::Done));
        assert_eq!(tracker.snapshot().summary_line(), "[ 1: Waiting, 0 Active, 1 Done ]");
    }

    #[test]
    fn test_rejects_skips_and_reversals() {
        let root = Path::new("/work");
        let tracker = ProgressTracker::new(&dirs(root, &["a"]), root);
        let a = root.join("a");

        // Waiting -> Done skips Active
        assert!(!tracker.finish(&a));
        assert_eq!(tracker.state(&a), Some(DirState::Waiting));

        assert!(tracker.start(&a));
        assert!(!tracker.start(&a));
        assert!(tracker.finish(&a));
        assert!(!tracker.start(&a));
        assert_eq!(tracker.state(&a), Some(DirState::Done));
    }

    #[test]
    fn test_unknown_directory_is_ignored() {
        let root = Path::new("/work");
        let tracker = ProgressTracker::new(&dirs(root, &["a"]), root);

        assert!(!tracker.start(&root.join("zzz")));
        assert_eq!(tracker.snapshot().total(), 1);
    }

    #[test]
    fn test_display_path() {
        let root = Path::new("/work");
        let tracker = ProgressTracker::new(&[], root);

        assert_eq!(tracker.display_path(root), ".");
        assert_eq!(
            tracker.display_path(&root.join("svc").join("api")),
            Path::new("svc").join("api").display().to_string()
        );
        assert_eq!(tracker.display_path(Path::new("/elsewhere")), "/elsewhere");
    }

    #[test]
    fn test_concurrent_updates_keep_counts_consistent() {
        let root = Path::new("/work");
        let all: Vec<PathBuf> = (0..64).map(|i| root.join(format!("d{i:02}"))).collect();
        let tracker = Arc::new(ProgressTracker::new(&all, root));

        let handles: Vec<_> = all
            .chunks(8)
            .map(|chunk| {
                let tracker = tracker.clone();
                let chunk = chunk.to_vec();
                std::thread::spawn(move || {
                    for dir in chunk {
                        assert!(tracker.start(&dir));
                        assert_eq!(tracker.snapshot().total(), 64);
                        assert!(tracker.finish(&dir));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = tracker.snapshot();
        assert_eq!((snapshot.waiting, snapshot.active, snapshot.done), (0, 0, 64));
    }
}
