//! animscan - static analysis of animation example projects.
//!
//! Turns a corpus of JS/TS example projects into one metadata document per
//! project (packages, hooks, functions, components, patterns) and folds those
//! documents into corpus-wide statistics.
//!
//! # Architecture
//!
//! - `parser`: tree-sitter parsing and node classification
//! - `extract`: import and call visitors folding into `FileFacts`
//! - `project`: file discovery, structure, hashing and per-project analysis
//! - `attribution`: reverse lookup of symbols to owning packages
//! - `patterns`: rule table inferring patterns and techniques
//! - `metadata`: per-project documents and atomic JSON writes
//! - `stats`: corpus-wide aggregation
//! - `pipeline`: batch driver used by the CLI

pub mod attribution;
pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod manifest;
pub mod metadata;
pub mod parser;
pub mod patterns;
pub mod pipeline;
pub mod project;
pub mod stats;

pub use attribution::{PackageAttributor, PackageDetail, PackagesDetail};
pub use config::ScanConfig;
pub use error::{Result, ScanError};
pub use extract::{extract_file, FileFacts};
pub use manifest::VersionManifest;
pub use metadata::{write_metadata, AnimationMetadata};
pub use parser::{parse_source, ParsedFile, SourceLanguage};
pub use patterns::{detect_patterns, DetectedPatterns};
pub use pipeline::{run_stats, BatchReport, Pipeline};
pub use project::{compute_project_hash, AnimationAnalyzer, FileStructure};
pub use stats::{aggregate_dir, AggregateStats, StatsAggregator};
