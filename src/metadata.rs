//! Per-project metadata documents.
//!
//! One JSON document per project slug. Documents are replaced wholesale on
//! every extraction and written through a temporary sibling file so that an
//! interrupted run never leaves a truncated document behind.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::attribution::PackagesDetail;
use crate::error::{Result, ScanError};
use crate::extract::ImportMap;
use crate::project::FileStructure;

/// Runtime and type bindings by module specifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    #[serde(default)]
    pub default: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub named: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub namespace: BTreeMap<String, Vec<String>>,
    #[serde(default, rename = "type")]
    pub type_only: BTreeMap<String, Vec<String>>,
}

impl ImportSummary {
    pub fn from_maps(
        default: &ImportMap,
        named: &ImportMap,
        namespace: &ImportMap,
        type_only: &ImportMap,
    ) -> Self {
        Self {
            default: to_sorted_lists(default),
            named: to_sorted_lists(named),
            namespace: to_sorted_lists(namespace),
            type_only: to_sorted_lists(type_only),
        }
    }
}

fn to_sorted_lists(map: &ImportMap) -> BTreeMap<String, Vec<String>> {
    map.iter()
        .map(|(k, v)| (k.clone(), v.iter().cloned().collect()))
        .collect()
}

/// Counts summarizing a project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataStats {
    pub total_files: usize,
    pub source_files: usize,
    pub packages: usize,
    pub hooks: usize,
    pub functions: usize,
    pub components: usize,
    pub patterns: usize,
    pub techniques: usize,
    pub namespace_calls: usize,
}

/// The metadata document for one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationMetadata {
    pub slug: String,
    pub content_hash: String,
    pub hash_algorithm: String,
    pub extracted_at: String,
    #[serde(default)]
    pub file_structure: FileStructure,
    #[serde(default)]
    pub packages: Vec<String>,
    #[serde(default)]
    pub packages_with_versions: BTreeMap<String, String>,
    #[serde(default)]
    pub imports: ImportSummary,
    #[serde(default)]
    pub packages_detail: PackagesDetail,
    #[serde(default)]
    pub hooks: Vec<String>,
    #[serde(default)]
    pub functions: Vec<String>,
    #[serde(default)]
    pub components: Vec<String>,
    #[serde(default)]
    pub patterns: Vec<String>,
    #[serde(default)]
    pub techniques: Vec<String>,
    #[serde(default)]
    pub stats: MetadataStats,
}

impl AnimationMetadata {
    /// Read a document from disk.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ScanError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ScanError::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Where the document for `slug` lives.
pub fn metadata_path(dir: &Path, slug: &str) -> PathBuf {
    dir.join(format!("{}.json", slug))
}

/// Write a project's document into `dir`, creating the directory if needed.
pub fn write_metadata(dir: &Path, metadata: &AnimationMetadata) -> Result<PathBuf> {
    fs::create_dir_all(dir).map_err(|source| ScanError::Write {
        path: dir.to_path_buf(),
        source,
    })?;
    let path = metadata_path(dir, &metadata.slug);
    write_json_atomic(&path, metadata)?;
    Ok(path)
}

/// Serialize `value` as pretty JSON and move it into place atomically.
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(|source| ScanError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let write_err = |source: std::io::Error| ScanError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(write_err)?;
    tmp.write_all(json.as_bytes()).map_err(write_err)?;
    tmp.write_all(b"\n").map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample(slug: &str) -> AnimationMetadata {
        AnimationMetadata {
            slug: slug.to_string(),
            content_hash: "ab".repeat(32),
            hash_algorithm: "sha256".to_string(),
            extracted_at: "2026-01-01T00:00:00Z".to_string(),
            file_structure: FileStructure::default(),
            packages: vec!["lib-x".to_string()],
            packages_with_versions: BTreeMap::new(),
            imports: ImportSummary::default(),
            packages_detail: PackagesDetail::new(),
            hooks: vec!["useSharedValue".to_string()],
            functions: vec![],
            components: vec![],
            patterns: vec!["shared-value-state".to_string()],
            techniques: vec![],
            stats: MetadataStats::default(),
        }
    }

    #[test]
    fn test_write_then_read() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("meta");
        let written = write_metadata(&out, &sample("demo-a")).unwrap();
        assert_eq!(written, out.join("demo-a.json"));

        let read = AnimationMetadata::read(&written).unwrap();
        assert_eq!(read, sample("demo-a"));
    }

    #[test]
    fn test_rewrite_replaces_document() {
        let temp = TempDir::new().unwrap();
        write_metadata(temp.path(), &sample("demo-a")).unwrap();

        let mut updated = sample("demo-a");
        updated.hooks.clear();
        let path = write_metadata(temp.path(), &updated).unwrap();

        assert!(AnimationMetadata::read(&path).unwrap().hooks.is_empty());
        let leftovers: Vec<_> = fs::read_dir(temp.path()).unwrap().collect();
        assert_eq!(leftovers.len(), 1);
    }

    #[test]
    fn test_json_field_names() {
        let value = serde_json::to_value(sample("demo-a")).unwrap();
        assert!(value.get("content_hash").is_some());
        assert!(value.get("packages_detail").is_some());
        assert!(value["imports"].get("type").is_some());
        assert!(value["file_structure"].get("entry").is_some());
    }

    #[test]
    fn test_read_rejects_malformed() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            AnimationMetadata::read(&path),
            Err(ScanError::Json { .. })
        ));
    }
}
