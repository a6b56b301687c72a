//! Per-file fact extraction.
//!
//! Extraction is a single pre-order walk over a parsed file. Every node is
//! classified once into a [`NodeKind`] and handed to each [`Extractor`], which
//! records what it finds into a shared [`FileFacts`] accumulator.
//!
//! ```text
//! ParsedFile ──walk──▶ NodeKind ──▶ ImportExtractor ──┐
//!                              └──▶ CallExtractor ────┴──▶ FileFacts
//! ```

mod calls;
mod imports;

pub use calls::{classify_call, CallExtractor, CallKind};
pub use imports::ImportExtractor;

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tree_sitter::Node;

use crate::config::ScanConfig;
use crate::parser::{NodeKind, ParsedFile};

/// Module specifier → set of bound names.
pub type ImportMap = BTreeMap<String, BTreeSet<String>>;

/// Facts collected from one file, or merged across a project.
///
/// All collections are ordered sets so that merged results are unique and
/// sorted without a separate pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFacts {
    /// Every module specifier seen in an import declaration.
    pub modules: BTreeSet<String>,
    /// `import X from "m"`: specifier → local names.
    pub default_imports: ImportMap,
    /// `import { a, b as c } from "m"`: specifier → local names.
    pub named_imports: ImportMap,
    /// `import * as X from "m"`: specifier → aliases.
    pub namespace_imports: ImportMap,
    /// Type-only bindings, excluded from attribution.
    pub type_imports: ImportMap,
    pub hooks: BTreeSet<String>,
    pub functions: BTreeSet<String>,
    pub components: BTreeSet<String>,
    /// `X.M(...)` calls: qualifier → method names.
    pub namespace_calls: BTreeMap<String, BTreeSet<String>>,
}

impl FileFacts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold another file's facts into this one.
    pub fn merge(&mut self, other: FileFacts) {
        self.modules.extend(other.modules);
        merge_map(&mut self.default_imports, other.default_imports);
        merge_map(&mut self.named_imports, other.named_imports);
        merge_map(&mut self.namespace_imports, other.namespace_imports);
        merge_map(&mut self.type_imports, other.type_imports);
        self.hooks.extend(other.hooks);
        self.functions.extend(other.functions);
        self.components.extend(other.components);
        merge_map(&mut self.namespace_calls, other.namespace_calls);
    }

    /// Drop every relative specifier (`./x`, `../x`, `/abs`) from the
    /// package-facing collections.
    pub fn retain_packages(&mut self) {
        self.modules.retain(|m| !is_relative_specifier(m));
        for map in [
            &mut self.default_imports,
            &mut self.named_imports,
            &mut self.namespace_imports,
            &mut self.type_imports,
        ] {
            map.retain(|m, _| !is_relative_specifier(m));
        }
    }

    pub(crate) fn add_import(map: &mut ImportMap, specifier: &str, name: &str) {
        map.entry(specifier.to_string())
            .or_default()
            .insert(name.to_string());
    }
}

fn merge_map(into: &mut BTreeMap<String, BTreeSet<String>>, from: BTreeMap<String, BTreeSet<String>>) {
    for (key, values) in from {
        into.entry(key).or_default().extend(values);
    }
}

/// Whether a module specifier points into the project rather than a package.
pub fn is_relative_specifier(specifier: &str) -> bool {
    specifier.starts_with('.') || specifier.starts_with('/')
}

/// A visitor over classified nodes.
pub trait Extractor {
    fn visit(&self, node: Node, kind: NodeKind, parsed: &ParsedFile, facts: &mut FileFacts);
}

/// Run extractors over every node of a parsed file.
pub fn walk(parsed: &ParsedFile, extractors: &[&dyn Extractor]) -> FileFacts {
    let mut facts = FileFacts::new();
    let mut cursor = parsed.root().walk();

    loop {
        let node = cursor.node();
        let kind = NodeKind::classify(node, parsed);
        if kind != NodeKind::Other {
            for extractor in extractors {
                extractor.visit(node, kind, parsed, &mut facts);
            }
        }

        if cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return facts;
            }
        }
    }
}

/// Extract imports and calls from one parsed file.
pub fn extract_file(parsed: &ParsedFile, config: &ScanConfig) -> FileFacts {
    let imports = ImportExtractor;
    let calls = CallExtractor::new(config);
    walk(parsed, &[&imports, &calls])
}
