use anyhow::{Context, Result, bail};
use ignore::WalkBuilder;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Make `root` absolute and check that it is an existing directory
pub fn resolve_root(root: &Path) -> Result<PathBuf> {
    let root_abs = std::path::absolute(root)
        .with_context(|| format!("Failed to resolve path: {}", root.display()))?;
    let metadata = std::fs::metadata(&root_abs)
        .with_context(|| format!("Failed to access path: {}", root_abs.display()))?;
    if !metadata.is_dir() {
        bail!("path is not a directory: {}", root_abs.display());
    }
    Ok(root_abs)
}

/// Find the directories under `root` that directly contain `marker`.
///
/// Depth counts path separators in a path relative to the root, so with
/// `max_depth = 0` only `root/<marker>` and the immediate children of the root
/// are visited. Anything deeper is pruned without being read. `None` walks the
/// whole tree.
///
/// Returned paths are absolute and deduplicated, in walk order. Any traversal
/// error aborts the scan.
pub fn find_marker_dirs(root: &Path, max_depth: Option<usize>, marker: &str) -> Result<Vec<PathBuf>> {
    let root_abs = resolve_root(root)?;

    // A relative path with N separators sits at walker depth N + 1
    let walker = WalkBuilder::new(&root_abs)
        .standard_filters(false)
        .follow_links(false)
        .max_depth(max_depth.map(|depth| depth + 1))
        .build();

    let mut seen = HashSet::new();
    let mut matched = Vec::new();

    for entry in walker {
        let entry = entry.with_context(|| format!("Failed to scan {}", root_abs.display()))?;
        let is_file = entry.file_type().is_some_and(|ft| !ft.is_dir());
        if !is_file || !entry.file_name().eq_ignore_ascii_case(marker) {
            continue;
        }
        if let Some(dir) = entry.path().parent()
            && seen.insert(dir.to_path_buf())
        {
            tracing::debug!("found {} in {}", marker, dir.display());
            matched.push(dir.to_path_buf());
        }
    }

    Ok(matched)
}

/// Sort directories by their raw path bytes, so `a-b` comes before `a/b`
pub fn sort_dirs(dirs: &mut [PathBuf]) {
    dirs.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
}
