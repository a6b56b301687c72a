//! Error taxonomy for extraction and aggregation.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the scanning pipeline.
///
/// Attribution gaps are deliberately absent: a hook, function or component
/// that cannot be traced to a package is simply left out of
/// `packages_detail`.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("corpus directory not found: {}", .0.display())]
    CorpusNotFound(PathBuf),
    #[error("project directory not found: {}", .0.display())]
    ProjectNotFound(PathBuf),
    #[error("invalid project slug {0:?}: must name a single corpus directory")]
    InvalidSlug(String),
    #[error("metadata directory not found: {}", .0.display())]
    MetadataDirNotFound(PathBuf),
    #[error("failed to parse {path} at {line}:{column}")]
    Parse {
        path: String,
        line: usize,
        column: usize,
    },
    #[error("failed to load grammar: {0}")]
    Grammar(#[from] tree_sitter::LanguageError),
    #[error("reading {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("writing {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("walking {}: {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
    #[error("invalid config: {0}")]
    Config(String),
}

impl ScanError {
    /// Whether this error aborts a whole batch rather than a single project.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ScanError::CorpusNotFound(_) | ScanError::MetadataDirNotFound(_) | ScanError::Config(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;
