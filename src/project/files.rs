//! File discovery inside a project directory.

use std::path::{Path, PathBuf};

use globset::GlobSet;
use walkdir::WalkDir;

use crate::error::{Result, ScanError};

/// Directories never descended into.
const SKIPPED_DIRS: &[&str] = &["node_modules"];

/// Filesystem metadata artifacts that are never project content.
const METADATA_ARTIFACTS: &[&str] = &["Thumbs.db", "desktop.ini"];

/// A file found under a project root.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ProjectFile {
    /// `/`-separated path relative to the project root.
    pub relative: String,
    /// Absolute (or root-joined) path for reading.
    pub path: PathBuf,
}

/// Collect files under `root` accepted by `accept`, sorted by relative path.
///
/// Hidden entries (names starting with `.`, which covers `.DS_Store` and
/// `.git`), `node_modules`, and metadata artifacts are skipped. Paths matched
/// by `excluded` are dropped.
pub fn discover_files<F>(root: &Path, excluded: Option<&GlobSet>, accept: F) -> Result<Vec<ProjectFile>>
where
    F: Fn(&Path) -> bool,
{
    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| {
            if e.depth() == 0 {
                return true;
            }
            let name = e.file_name().to_string_lossy();
            if name.starts_with('.') {
                return false;
            }
            if e.file_type().is_dir() && SKIPPED_DIRS.contains(&name.as_ref()) {
                return false;
            }
            true
        })
    {
        let entry = entry.map_err(|source| ScanError::Walk {
            path: root.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        if METADATA_ARTIFACTS.contains(&name.as_ref()) {
            continue;
        }

        let path = entry.path();
        if !accept(path) {
            continue;
        }

        let relative = relative_path(root, path);
        if let Some(globs) = excluded {
            if globs.is_match(&relative) {
                continue;
            }
        }

        files.push(ProjectFile {
            relative,
            path: path.to_path_buf(),
        });
    }

    files.sort();
    Ok(files)
}

/// Path of `path` relative to `root`, always `/`-separated.
pub fn relative_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
