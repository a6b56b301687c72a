//! Content hashing for change detection.
//!
//! The digest covers every source and data file under the project root. Paths
//! are sorted before hashing, so the result never depends on the order in
//! which the filesystem returns directory entries.

use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};

use super::files::{discover_files, ProjectFile};
use crate::error::{Result, ScanError};
use crate::parser::{is_data_file, is_source_file};

/// Name of the digest algorithm, recorded next to the hash.
pub const HASH_ALGORITHM: &str = "sha256";

/// Compute the content hash of a project directory.
pub fn compute_project_hash(root: &Path) -> Result<String> {
    let files = discover_files(root, None, |p| is_source_file(p) || is_data_file(p))?;
    hash_files(&files)
}

/// Hash `(relative path, bytes)` for each file, in sorted relative-path order.
pub fn hash_files(files: &[ProjectFile]) -> Result<String> {
    let mut ordered: Vec<&ProjectFile> = files.iter().collect();
    ordered.sort_by(|a, b| a.relative.cmp(&b.relative));

    let mut hasher = Sha256::new();
    for file in ordered {
        let content = fs::read(&file.path).map_err(|source| ScanError::Read {
            path: file.path.clone(),
            source,
        })?;
        hasher.update(file.relative.as_bytes());
        hasher.update(&content);
    }
    Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn project(files: &[(&str, &str)]) -> TempDir {
        let temp = TempDir::new().unwrap();
        for (rel, content) in files {
            let path = temp.path().join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        temp
    }

    #[test]
    fn test_hash_is_stable() {
        let a = project(&[("App.tsx", "export {}"), ("app.json", "{}")]);
        let first = compute_project_hash(a.path()).unwrap();
        let second = compute_project_hash(a.path()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 64);
    }

    #[test]
    fn test_hash_same_content_different_roots() {
        let a = project(&[("App.tsx", "export {}"), ("src/a.ts", "1")]);
        let b = project(&[("src/a.ts", "1"), ("App.tsx", "export {}")]);
        assert_eq!(
            compute_project_hash(a.path()).unwrap(),
            compute_project_hash(b.path()).unwrap()
        );
    }

    #[test]
    fn test_hash_sensitive_to_content_and_rename() {
        let base = project(&[("App.tsx", "export {}")]);
        let edited = project(&[("App.tsx", "export {};")]);
        let renamed = project(&[("Main.tsx", "export {}")]);

        let h = compute_project_hash(base.path()).unwrap();
        assert_ne!(h, compute_project_hash(edited.path()).unwrap());
        assert_ne!(h, compute_project_hash(renamed.path()).unwrap());
    }

    #[test]
    fn test_hash_includes_data_but_not_artifacts() {
        let base = project(&[("App.tsx", "x")]);
        let with_data = project(&[("App.tsx", "x"), ("assets/data.json", "[]")]);
        let with_artifacts = project(&[("App.tsx", "x"), (".DS_Store", "junk"), ("notes.md", "hi")]);

        let h = compute_project_hash(base.path()).unwrap();
        assert_ne!(h, compute_project_hash(with_data.path()).unwrap());
        assert_eq!(h, compute_project_hash(with_artifacts.path()).unwrap());
    }

    #[test]
    fn test_hash_ignores_input_order() {
        let temp = project(&[("b.ts", "b"), ("a.ts", "a")]);
        let a = ProjectFile {
            relative: "a.ts".to_string(),
            path: temp.path().join("a.ts"),
        };
        let b = ProjectFile {
            relative: "b.ts".to_string(),
            path: temp.path().join("b.ts"),
        };
        assert_eq!(
            hash_files(&[a.clone(), b.clone()]).unwrap(),
            hash_files(&[b, a]).unwrap()
        );
    }
}
