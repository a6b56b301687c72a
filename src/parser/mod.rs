//! Source parsing for JavaScript and TypeScript modules.
//!
//! This module provides:
//! - `SourceLanguage`: grammar selection by file extension
//! - `ParsedFile`: a tree-sitter tree together with its source bytes
//! - `NodeKind`: the closed set of node shapes the extractors care about
//!
//! `.ts` files use the TypeScript grammar. Everything else that may contain
//! JSX (`.tsx`, `.js`, `.jsx`, `.mjs`, `.cjs`) uses the TSX grammar.

mod node;

pub use node::{CalleeShape, NodeKind};

use std::path::Path;

use tree_sitter::{Language, Node, Parser, Tree};

use crate::error::{Result, ScanError};

/// Extensions of files the extractors parse.
pub const SOURCE_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx", "mjs", "cjs"];

/// Extensions of data files that feed the content hash but are never parsed.
pub const DATA_EXTENSIONS: &[&str] = &["json"];

/// Grammar used for a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceLanguage {
    TypeScript,
    Tsx,
}

impl SourceLanguage {
    /// Pick the grammar for an extension (without dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "ts" => Some(SourceLanguage::TypeScript),
            "tsx" | "js" | "jsx" | "mjs" | "cjs" => Some(SourceLanguage::Tsx),
            _ => None,
        }
    }

    /// Pick the grammar for a path.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceLanguage::TypeScript => "typescript",
            SourceLanguage::Tsx => "tsx",
        }
    }

    fn grammar(&self) -> Language {
        match self {
            SourceLanguage::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            SourceLanguage::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }
}

/// Whether a path has a parseable source extension.
pub fn is_source_file(path: &Path) -> bool {
    has_extension(path, SOURCE_EXTENSIONS)
}

/// Whether a path has a data extension.
pub fn is_data_file(path: &Path) -> bool {
    has_extension(path, DATA_EXTENSIONS)
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| extensions.contains(&e))
        .unwrap_or(false)
}

/// Holds a parsed tree-sitter tree and the source it was built from.
pub struct ParsedFile {
    /// The tree-sitter parse tree.
    pub tree: Tree,
    /// The original source code (kept for node text extraction).
    pub source: Vec<u8>,
    /// Path used in error reports, relative to the project root.
    pub path: String,
    pub language: SourceLanguage,
}

impl ParsedFile {
    /// Get text for a tree-sitter node.
    pub fn node_text(&self, node: Node) -> &str {
        node.utf8_text(&self.source).unwrap_or("")
    }

    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }
}

/// Parse one file.
///
/// tree-sitter recovers from malformed input by inserting ERROR and MISSING
/// nodes. Any such node makes the file a parse failure, located at the first
/// offending node.
pub fn parse_source(path: &str, language: SourceLanguage, source: &[u8]) -> Result<ParsedFile> {
    let mut parser = Parser::new();
    parser.set_language(&language.grammar())?;

    let tree = parser.parse(source, None).ok_or_else(|| ScanError::Parse {
        path: path.to_string(),
        line: 1,
        column: 1,
    })?;

    let root = tree.root_node();
    if root.has_error() {
        let at = first_error(root).unwrap_or(root).start_position();
        return Err(ScanError::Parse {
            path: path.to_string(),
            line: at.row + 1,
            column: at.column + 1,
        });
    }

    Ok(ParsedFile {
        tree,
        source: source.to_vec(),
        path: path.to_string(),
        language,
    })
}

/// Find the first ERROR or MISSING node in document order.
fn first_error<'a>(node: Node<'a>) -> Option<Node<'a>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(found) = first_error(child) {
            return Some(found);
        }
    }
    None
}

/// Strip the surrounding quotes from a string literal's text.
pub fn unquote(raw: &str) -> &str {
    let trimmed = raw.trim();
    let bytes = trimmed.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes[0];
        let last = bytes[bytes.len() - 1];
        if first == last && matches!(first, b'"' | b'\'' | b'`') {
            return &trimmed[1..trimmed.len() - 1];
        }
    }
    trimmed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_by_extension() {
        assert_eq!(
            SourceLanguage::from_extension("ts"),
            Some(SourceLanguage::TypeScript)
        );
        assert_eq!(SourceLanguage::from_extension("tsx"), Some(SourceLanguage::Tsx));
        assert_eq!(SourceLanguage::from_extension("jsx"), Some(SourceLanguage::Tsx));
        assert_eq!(SourceLanguage::from_extension("js"), Some(SourceLanguage::Tsx));
        assert_eq!(SourceLanguage::from_extension("json"), None);
        assert_eq!(SourceLanguage::from_extension("mts"), None);
    }

    #[test]
    fn test_source_and_data_files() {
        assert!(is_source_file(Path::new("src/App.tsx")));
        assert!(!is_source_file(Path::new("app.json")));
        assert!(is_data_file(Path::new("app.json")));
        assert!(!is_data_file(Path::new("README.md")));
    }

    #[test]
    fn test_parse_valid_tsx() {
        let source = br#"
import Animated from 'react-native-reanimated';

export default function Box() {
  return <Animated.View style={{ width: 10 }} />;
}
"#;
        let parsed = parse_source("Box.tsx", SourceLanguage::Tsx, source).unwrap();
        assert_eq!(parsed.root().kind(), "program");
        assert_eq!(parsed.path, "Box.tsx");
    }

    #[test]
    fn test_parse_typescript_generics() {
        let source = b"const ref = useRef<number>(0);\nconst n = <number>ref.current;\n";
        assert!(parse_source("hooks.ts", SourceLanguage::TypeScript, source).is_ok());
    }

    #[test]
    fn test_parse_failure_reports_location() {
        let source = b"const ok = 1;\nconst = ;\n";
        match parse_source("broken.ts", SourceLanguage::TypeScript, source) {
            Err(ScanError::Parse { path, line, .. }) => {
                assert_eq!(path, "broken.ts");
                assert_eq!(line, 2);
            }
            other => panic!("expected parse failure, got {:?}", other.map(|p| p.path)),
        }
    }

    #[test]
    fn test_unquote() {
        assert_eq!(unquote("'react'"), "react");
        assert_eq!(unquote("\"./local\""), "./local");
        assert_eq!(unquote("''"), "");
        assert_eq!(unquote("bare"), "bare");
    }
}
