//! Project-level orchestration: discover, parse, extract, merge, enrich.

use std::fs;
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use tracing::{debug, info};

use super::files::discover_files;
use super::hash::{hash_files, HASH_ALGORITHM};
use super::structure::FileStructure;
use crate::attribution::PackageAttributor;
use crate::config::ScanConfig;
use crate::error::{Result, ScanError};
use crate::extract::{extract_file, FileFacts};
use crate::manifest::VersionManifest;
use crate::metadata::{AnimationMetadata, ImportSummary, MetadataStats};
use crate::parser::{is_data_file, is_source_file, parse_source, SourceLanguage};
use crate::patterns::{detect_patterns, Usage};

/// Facts merged across every source file of a project.
#[derive(Debug, Clone)]
pub struct ProjectFacts {
    /// Merged facts with relative specifiers removed.
    pub facts: FileFacts,
    /// Relative paths of the parsed source files, sorted.
    pub source_files: Vec<String>,
}

/// Builds metadata documents for project directories.
pub struct AnimationAnalyzer<'c> {
    config: &'c ScanConfig,
    versions: VersionManifest,
}

impl<'c> AnimationAnalyzer<'c> {
    pub fn new(config: &'c ScanConfig) -> Self {
        Self {
            config,
            versions: VersionManifest::default(),
        }
    }

    /// Use `versions` for `packages_with_versions`.
    pub fn with_versions(mut self, versions: VersionManifest) -> Self {
        self.versions = versions;
        self
    }

    /// Parse every source file under `root` and merge the extracted facts.
    ///
    /// The first file that fails to parse aborts the whole project.
    pub fn collect_facts(&self, root: &Path) -> Result<ProjectFacts> {
        if !root.is_dir() {
            return Err(ScanError::ProjectNotFound(root.to_path_buf()));
        }

        let excluded = self.config.excluded_path_matcher()?;
        let files = discover_files(root, Some(&excluded), is_source_file)?;

        let mut merged = FileFacts::new();
        let mut source_files = Vec::with_capacity(files.len());

        for file in &files {
            let language = match SourceLanguage::from_path(&file.path) {
                Some(l) => l,
                None => continue,
            };
            let source = fs::read(&file.path).map_err(|source| ScanError::Read {
                path: file.path.clone(),
                source,
            })?;
            let parsed = parse_source(&file.relative, language, &source)?;
            let facts = extract_file(&parsed, self.config);
            debug!(
                file = %file.relative,
                language = language.as_str(),
                hooks = facts.hooks.len(),
                functions = facts.functions.len(),
                components = facts.components.len(),
                "extracted file"
            );
            merged.merge(facts);
            source_files.push(file.relative.clone());
        }

        merged.retain_packages();
        Ok(ProjectFacts {
            facts: merged,
            source_files,
        })
    }

    /// Build the full metadata document for the project at `root`.
    pub fn analyze(&self, slug: &str, root: &Path) -> Result<AnimationMetadata> {
        let ProjectFacts {
            facts,
            source_files,
        } = self.collect_facts(root)?;

        let hashed = discover_files(root, None, |p| is_source_file(p) || is_data_file(p))?;
        let content_hash = hash_files(&hashed)?;

        let file_structure = FileStructure::from_paths(source_files.iter().map(String::as_str));

        let packages_detail = PackageAttributor::new(&facts, self.config).attribute(&facts);
        let detected = detect_patterns(&Usage {
            hooks: &facts.hooks,
            functions: &facts.functions,
            components: &facts.components,
        });

        let packages: Vec<String> = facts.modules.iter().cloned().collect();
        let packages_with_versions = self.versions.resolve(&packages);

        let stats = MetadataStats {
            total_files: hashed.len(),
            source_files: source_files.len(),
            packages: packages.len(),
            hooks: facts.hooks.len(),
            functions: facts.functions.len(),
            components: facts.components.len(),
            patterns: detected.patterns.len(),
            techniques: detected.techniques.len(),
            namespace_calls: facts.namespace_calls.values().map(|m| m.len()).sum(),
        };

        info!(
            slug,
            files = stats.source_files,
            packages = stats.packages,
            patterns = stats.patterns,
            "analyzed project"
        );

        Ok(AnimationMetadata {
            slug: slug.to_string(),
            content_hash,
            hash_algorithm: HASH_ALGORITHM.to_string(),
            extracted_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            file_structure,
            packages,
            packages_with_versions,
            imports: ImportSummary::from_maps(
                &facts.default_imports,
                &facts.named_imports,
                &facts.namespace_imports,
                &facts.type_imports,
            ),
            packages_detail,
            hooks: facts.hooks.iter().cloned().collect(),
            functions: facts.functions.iter().cloned().collect(),
            components: facts.components.iter().cloned().collect(),
            patterns: detected.patterns,
            techniques: detected.techniques,
            stats,
        })
    }
}
