//! Project directory analysis.
//!
//! - `files`: source and data file discovery
//! - `structure`: structural categorization of source files
//! - `hash`: order-independent content hashing
//! - `analyzer`: per-project orchestration into a metadata document

mod analyzer;
mod files;
mod hash;
mod structure;

pub use analyzer::{AnimationAnalyzer, ProjectFacts};
pub use files::{discover_files, relative_path, ProjectFile};
pub use hash::{compute_project_hash, hash_files, HASH_ALGORITHM};
pub use structure::{classify_path, FileCategory, FileStructure};
