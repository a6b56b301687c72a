//! Import declaration extraction.
//!
//! Records every `import` statement in the tree, not just top-level ones:
//!
//! - `import X from "m"` → default binding `X`
//! - `import { a, b as c } from "m"` → named bindings `a`, `c`
//! - `import * as N from "m"` → namespace alias `N`
//! - `import type { T } from "m"` / `import { type T } from "m"` → type-only
//! - `import X = require("m")` → default binding `X`
//! - `import "m"` → specifier only

use tree_sitter::Node;

use super::{Extractor, FileFacts};
use crate::parser::{unquote, NodeKind, ParsedFile};

/// Collects import declarations.
pub struct ImportExtractor;

impl Extractor for ImportExtractor {
    fn visit(&self, node: Node, kind: NodeKind, parsed: &ParsedFile, facts: &mut FileFacts) {
        if kind == NodeKind::ImportStatement {
            record_import(node, parsed, facts);
        }
    }
}

fn record_import(statement: Node, parsed: &ParsedFile, facts: &mut FileFacts) {
    let mut type_only = false;
    let mut clause = None;
    let mut require_clause = None;

    let mut cursor = statement.walk();
    for child in statement.children(&mut cursor) {
        match child.kind() {
            "type" | "typeof" => type_only = true,
            "import_clause" => clause = Some(child),
            "import_require_clause" => require_clause = Some(child),
            _ => {}
        }
    }

    if let Some(require_clause) = require_clause {
        record_require_clause(require_clause, type_only, parsed, facts);
        return;
    }

    let specifier = match statement.child_by_field_name("source") {
        Some(source) => unquote(parsed.node_text(source)).to_string(),
        None => return,
    };
    if specifier.is_empty() {
        return;
    }
    facts.modules.insert(specifier.clone());

    if let Some(clause) = clause {
        record_clause(clause, &specifier, type_only, parsed, facts);
    }
}

fn record_clause(
    clause: Node,
    specifier: &str,
    type_only: bool,
    parsed: &ParsedFile,
    facts: &mut FileFacts,
) {
    let mut cursor = clause.walk();
    for child in clause.children(&mut cursor) {
        match child.kind() {
            "identifier" => {
                let name = parsed.node_text(child);
                let bucket = if type_only {
                    &mut facts.type_imports
                } else {
                    &mut facts.default_imports
                };
                FileFacts::add_import(bucket, specifier, name);
            }
            "namespace_import" => {
                if let Some(alias) = first_identifier(child) {
                    let bucket = if type_only {
                        &mut facts.type_imports
                    } else {
                        &mut facts.namespace_imports
                    };
                    FileFacts::add_import(bucket, specifier, parsed.node_text(alias));
                }
            }
            "named_imports" => record_named_imports(child, specifier, type_only, parsed, facts),
            _ => {}
        }
    }
}

fn record_named_imports(
    named: Node,
    specifier: &str,
    clause_type_only: bool,
    parsed: &ParsedFile,
    facts: &mut FileFacts,
) {
    let mut cursor = named.walk();
    for spec in named.children(&mut cursor) {
        if spec.kind() != "import_specifier" {
            continue;
        }

        let local = spec
            .child_by_field_name("alias")
            .or_else(|| spec.child_by_field_name("name"));
        let local = match local {
            Some(n) => unquote(parsed.node_text(n)),
            None => continue,
        };
        if local.is_empty() {
            continue;
        }

        let type_only = clause_type_only || has_type_modifier(spec);
        let bucket = if type_only {
            &mut facts.type_imports
        } else {
            &mut facts.named_imports
        };
        FileFacts::add_import(bucket, specifier, local);
    }
}

fn record_require_clause(
    clause: Node,
    type_only: bool,
    parsed: &ParsedFile,
    facts: &mut FileFacts,
) {
    let specifier = match clause.child_by_field_name("source") {
        Some(source) => unquote(parsed.node_text(source)).to_string(),
        None => return,
    };
    if specifier.is_empty() {
        return;
    }
    facts.modules.insert(specifier.clone());

    if let Some(binding) = first_identifier(clause) {
        let bucket = if type_only {
            &mut facts.type_imports
        } else {
            &mut facts.default_imports
        };
        FileFacts::add_import(bucket, &specifier, parsed.node_text(binding));
    }
}

/// `import { type T }`: the specifier starts with an anonymous `type` token.
fn has_type_modifier(spec: Node) -> bool {
    let mut cursor = spec.walk();
    let found = spec
        .children(&mut cursor)
        .any(|c| !c.is_named() && matches!(c.kind(), "type" | "typeof"));
    found
}

fn first_identifier(node: Node) -> Option<Node> {
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .find(|c| c.kind() == "identifier");
    found
}
