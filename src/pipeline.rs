//! Batch driver: one project, every project, or the aggregate.
//!
//! A failing project is logged and counted without stopping the batch. A
//! missing corpus directory stops everything before any project is touched.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::ScanConfig;
use crate::error::{Result, ScanError};
use crate::manifest::VersionManifest;
use crate::metadata::{write_json_atomic, write_metadata};
use crate::project::AnimationAnalyzer;
use crate::stats::{aggregate_dir, AggregateStats};

/// Result of extracting one project inside a batch.
#[derive(Debug)]
pub struct ProjectOutcome {
    pub slug: String,
    /// Path of the written document, or why the project failed.
    pub result: Result<PathBuf>,
}

impl ProjectOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Per-project outcomes of `extract --all`, in slug order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<ProjectOutcome>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }
}

/// Extraction over a corpus directory.
pub struct Pipeline<'c> {
    corpus: PathBuf,
    metadata_dir: PathBuf,
    analyzer: AnimationAnalyzer<'c>,
}

impl<'c> Pipeline<'c> {
    pub fn new(config: &'c ScanConfig, corpus: impl Into<PathBuf>, metadata_dir: impl Into<PathBuf>) -> Self {
        Self {
            corpus: corpus.into(),
            metadata_dir: metadata_dir.into(),
            analyzer: AnimationAnalyzer::new(config),
        }
    }

    /// Resolve `packages_with_versions` against `versions`.
    pub fn with_versions(mut self, versions: VersionManifest) -> Self {
        self.analyzer = self.analyzer.with_versions(versions);
        self
    }

    pub fn metadata_dir(&self) -> &Path {
        &self.metadata_dir
    }

    fn check_corpus(&self) -> Result<()> {
        if self.corpus.is_dir() {
            Ok(())
        } else {
            Err(ScanError::CorpusNotFound(self.corpus.clone()))
        }
    }

    /// Project slugs in the corpus: visible subdirectories, sorted.
    pub fn list_projects(&self) -> Result<Vec<String>> {
        self.check_corpus()?;
        let read_err = |source: std::io::Error| ScanError::Read {
            path: self.corpus.clone(),
            source,
        };

        let mut slugs = Vec::new();
        for entry in fs::read_dir(&self.corpus).map_err(read_err)? {
            let entry = entry.map_err(read_err)?;
            if !entry.path().is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') || name == "node_modules" {
                continue;
            }
            slugs.push(name);
        }
        slugs.sort();
        Ok(slugs)
    }

    /// Analyze one project and write its document.
    pub fn extract_one(&self, slug: &str) -> Result<PathBuf> {
        self.check_corpus()?;
        check_slug(slug)?;
        self.extract_project(slug)
    }

    fn extract_project(&self, slug: &str) -> Result<PathBuf> {
        let root = self.corpus.join(slug);
        let metadata = self.analyzer.analyze(slug, &root)?;
        let path = write_metadata(&self.metadata_dir, &metadata)?;
        info!(slug, path = %path.display(), "wrote metadata");
        Ok(path)
    }

    /// Analyze every project in the corpus.
    ///
    /// Only fatal errors are returned; per-project failures land in the
    /// report.
    pub fn extract_all(&self) -> Result<BatchReport> {
        let slugs = self.list_projects()?;
        info!(corpus = %self.corpus.display(), projects = slugs.len(), "extracting corpus");

        let mut report = BatchReport::default();
        for slug in slugs {
            let result = match self.extract_project(&slug) {
                Err(e) if e.is_fatal() => return Err(e),
                result => result,
            };
            if let Err(e) = &result {
                warn!(slug = %slug, error = %e, "extraction failed");
            }
            report.outcomes.push(ProjectOutcome { slug, result });
        }

        info!(
            succeeded = report.succeeded(),
            failed = report.failed(),
            "extraction finished"
        );
        Ok(report)
    }
}

/// A slug names exactly one directory inside the corpus.
fn check_slug(slug: &str) -> Result<()> {
    let invalid = slug.is_empty()
        || slug == "."
        || slug == ".."
        || slug.contains(|c: char| c == '/' || c == '\\')
        || Path::new(slug).is_absolute();
    if invalid {
        Err(ScanError::InvalidSlug(slug.to_string()))
    } else {
        Ok(())
    }
}

/// Whether `output` sits directly inside `metadata_dir`, however either
/// path is spelled.
fn output_in_dir(metadata_dir: &Path, output: &Path) -> bool {
    let dir = match fs::canonicalize(metadata_dir) {
        Ok(d) => d,
        Err(_) => return false,
    };
    if let Ok(file) = fs::canonicalize(output) {
        return file.parent() == Some(dir.as_path());
    }
    let parent = match output.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::canonicalize(parent).map(|p| p == dir).unwrap_or(false)
}

/// Recompute the aggregate from every document in `metadata_dir` and write
/// it to `output`.
pub fn run_stats(metadata_dir: &Path, output: &Path, config: &ScanConfig) -> Result<AggregateStats> {
    let inside = output_in_dir(metadata_dir, output);
    let stats = aggregate_dir(metadata_dir, config, inside.then_some(output))?;
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| ScanError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    write_json_atomic(output, &stats)?;
    info!(path = %output.display(), "wrote stats");
    Ok(stats)
}
