//! Filesystem utilities.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::WalkDir;

/// Directory names never searched for manifests.
pub const DEFAULT_SKIP_DIRS: &[&str] = &["bin", "_bin"];

/// Read a file to string, with nice error messages.
pub fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read file: {}", path.display()))
}

/// Get the relative path from `base` to `path`.
pub fn relative_path(base: &Path, path: &Path) -> PathBuf {
    pathdiff::diff_paths(path, base).unwrap_or_else(|| path.to_path_buf())
}

/// Whether a directory should be skipped during manifest discovery: hidden
/// directories, build output directories, and anything in `extra`.
pub fn is_skipped_dir(name: &str, extra: &[String]) -> bool {
    name.starts_with('.') || DEFAULT_SKIP_DIRS.contains(&name) || extra.iter().any(|e| e == name)
}

/// Find every file called `manifest_name` under `root`, in a stable order.
///
/// The root itself is always searched, even if its own name would be
/// skipped.
pub fn find_manifests(root: &Path, manifest_name: &str, skip_dirs: &[String]) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0
                || !entry.file_type().is_dir()
                || !is_skipped_dir(&entry.file_name().to_string_lossy(), skip_dirs)
        });

    for entry in walker {
        let entry = entry.with_context(|| format!("failed to walk {}", root.display()))?;
        if entry.file_type().is_file() && entry.file_name() == manifest_name {
            tracing::debug!("found manifest {}", entry.path().display());
            found.push(entry.into_path());
        }
    }

    Ok(found)
}
