//! Scan configuration.
//!
//! All tables that drive classification and attribution live in one
//! immutable [`ScanConfig`] value that is built once and passed by reference
//! through the pipeline. Defaults reproduce the built-in tables; a YAML file
//! may override any of them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use phf::phf_set;

use crate::error::{Result, ScanError};

/// Default config file names to search for.
pub const DEFAULT_CONFIG_NAMES: &[&str] = &["animscan.yaml", ".animscan.yaml"];

/// Call names that never count as functions on their own.
///
/// Collection operations, math helpers, console and timer functions, module
/// keywords, promise callbacks and generic lookups.
pub static DEFAULT_EXCLUDED_CALLS: phf::Set<&'static str> = phf_set! {
    "map", "filter", "reduce", "forEach", "find", "findIndex", "some", "every",
    "includes", "indexOf", "push", "pop", "slice", "splice", "concat", "join",
    "sort", "keys", "values", "entries",
    "max", "min", "abs", "floor", "ceil", "round", "sqrt", "pow", "random",
    "log", "warn", "error",
    "setTimeout", "setInterval", "clearTimeout", "clearInterval",
    "require", "import",
    "then", "catch",
    "get", "set", "has",
};

/// Namespace whose members are runtime-created animated components.
pub const DEFAULT_ANIMATION_NAMESPACE: &str = "Animated";
/// Package that owns the animation namespace.
pub const DEFAULT_ANIMATION_PACKAGE: &str = "react-native-reanimated";
/// Graphics canvas library whose wrapped components are recovered in stats.
pub const DEFAULT_CANVAS_PACKAGE: &str = "@shopify/react-native-skia";
/// Wrapper package that implicitly renders canvas components.
pub const DEFAULT_CANVAS_WRAPPER_PACKAGE: &str = "react-native-skia-gesture";
/// Canvas components implied by the wrapper package.
pub const DEFAULT_CANVAS_WRAPPER_COMPONENTS: &[&str] = &["Canvas", "Group"];

/// Immutable configuration for extraction and aggregation.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Call names excluded from function classification.
    pub excluded_calls: BTreeSet<String>,
    /// Qualifier that marks `X.M` calls and tags as animated components.
    pub animation_namespace: String,
    /// Package credited with every component under `animation_namespace`.
    pub animation_package: String,
    /// Canvas library that receives wrapped-component backfill in stats.
    pub canvas_package: String,
    /// Wrapper package treated as rendering `canvas_wrapper_components`.
    pub canvas_wrapper_package: String,
    pub canvas_wrapper_components: Vec<String>,
    /// Glob patterns (relative to a project root) skipped during discovery.
    pub excluded_paths: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            excluded_calls: DEFAULT_EXCLUDED_CALLS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            animation_namespace: DEFAULT_ANIMATION_NAMESPACE.to_string(),
            animation_package: DEFAULT_ANIMATION_PACKAGE.to_string(),
            canvas_package: DEFAULT_CANVAS_PACKAGE.to_string(),
            canvas_wrapper_package: DEFAULT_CANVAS_WRAPPER_PACKAGE.to_string(),
            canvas_wrapper_components: DEFAULT_CANVAS_WRAPPER_COMPONENTS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            excluded_paths: Vec::new(),
        }
    }
}

impl ScanConfig {
    /// Parse a config from a YAML file. Missing keys fall back to defaults.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ScanError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: ScanConfig = serde_yaml::from_str(&content)
            .map_err(|e| ScanError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Look for a config file in `dir`, returning the first that exists.
    pub fn discover(dir: &Path) -> Option<PathBuf> {
        DEFAULT_CONFIG_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|p| p.is_file())
    }

    /// Check that the config is usable.
    pub fn validate(&self) -> Result<()> {
        if self.animation_namespace.is_empty() {
            return Err(ScanError::Config(
                "animation_namespace must not be empty".to_string(),
            ));
        }
        if self.animation_package.is_empty() {
            return Err(ScanError::Config(
                "animation_package must not be empty".to_string(),
            ));
        }
        self.excluded_path_matcher().map(|_| ())
    }

    /// Whether a call name is in the exclusion table.
    pub fn is_excluded_call(&self, name: &str) -> bool {
        self.excluded_calls.contains(name)
    }

    /// Compile `excluded_paths` into a matcher.
    pub fn excluded_path_matcher(&self) -> Result<GlobSet> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.excluded_paths {
            let glob = Glob::new(pattern).map_err(|e| {
                ScanError::Config(format!("invalid excluded_paths pattern {:?}: {}", pattern, e))
            })?;
            builder.add(glob);
        }
        builder
            .build()
            .map_err(|e| ScanError::Config(format!("excluded_paths: {}", e)))
    }
}
