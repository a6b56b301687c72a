//! Classification of tree-sitter nodes into the shapes the extractors visit.

use tree_sitter::Node;

use super::ParsedFile;

/// Shape of a call expression's callee.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalleeShape<'a> {
    /// `name(...)`
    Identifier(&'a str),
    /// `object.property(...)` where `object` is a plain identifier.
    Member { object: &'a str, property: &'a str },
    /// Anything else: computed members, `this.x()`, chains, `import()`.
    Unsupported,
}

/// The node kinds the extractors distinguish. Everything else is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind<'a> {
    ImportStatement,
    CallExpression(CalleeShape<'a>),
    /// `<Tag ...>`; `None` for fragments.
    JsxOpeningElement(Option<&'a str>),
    /// `<Tag ... />`
    JsxSelfClosingElement(Option<&'a str>),
    Other,
}

impl<'a> NodeKind<'a> {
    /// Classify a node of `parsed`.
    pub fn classify(node: Node<'a>, parsed: &'a ParsedFile) -> Self {
        match node.kind() {
            "import_statement" => NodeKind::ImportStatement,
            "call_expression" => {
                let callee = node
                    .child_by_field_name("function")
                    .map(|f| callee_shape(f, parsed))
                    .unwrap_or(CalleeShape::Unsupported);
                NodeKind::CallExpression(callee)
            }
            "jsx_opening_element" => NodeKind::JsxOpeningElement(jsx_tag_name(node, parsed)),
            "jsx_self_closing_element" => {
                NodeKind::JsxSelfClosingElement(jsx_tag_name(node, parsed))
            }
            _ => NodeKind::Other,
        }
    }
}

fn callee_shape<'a>(callee: Node<'a>, parsed: &'a ParsedFile) -> CalleeShape<'a> {
    match callee.kind() {
        "identifier" => CalleeShape::Identifier(parsed.node_text(callee)),
        "member_expression" => {
            let object = callee.child_by_field_name("object");
            let property = callee.child_by_field_name("property");
            match (object, property) {
                (Some(object), Some(property))
                    if object.kind() == "identifier"
                        && matches!(
                            property.kind(),
                            "property_identifier" | "private_property_identifier"
                        ) =>
                {
                    CalleeShape::Member {
                        object: parsed.node_text(object),
                        property: parsed.node_text(property),
                    }
                }
                _ => CalleeShape::Unsupported,
            }
        }
        _ => CalleeShape::Unsupported,
    }
}

fn jsx_tag_name<'a>(element: Node<'a>, parsed: &'a ParsedFile) -> Option<&'a str> {
    let name = element.child_by_field_name("name")?;
    let text = parsed.node_text(name).trim();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse_source, SourceLanguage};

    fn collect_kinds(source: &[u8]) -> Vec<String> {
        let parsed = parse_source("t.tsx", SourceLanguage::Tsx, source).unwrap();
        let mut out = Vec::new();
        let mut stack = vec![parsed.root()];
        while let Some(node) = stack.pop() {
            match NodeKind::classify(node, &parsed) {
                NodeKind::ImportStatement => out.push("import".to_string()),
                NodeKind::CallExpression(CalleeShape::Identifier(n)) => {
                    out.push(format!("call:{}", n))
                }
                NodeKind::CallExpression(CalleeShape::Member { object, property }) => {
                    out.push(format!("member:{}.{}", object, property))
                }
                NodeKind::CallExpression(CalleeShape::Unsupported) => {
                    out.push("call:?".to_string())
                }
                NodeKind::JsxOpeningElement(Some(tag)) => out.push(format!("open:{}", tag)),
                NodeKind::JsxSelfClosingElement(Some(tag)) => out.push(format!("self:{}", tag)),
                NodeKind::JsxOpeningElement(None) | NodeKind::JsxSelfClosingElement(None) => {
                    out.push("fragment".to_string())
                }
                NodeKind::Other => {}
            }
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                stack.push(child);
            }
        }
        out.sort();
        out
    }

    #[test]
    fn test_classify_calls() {
        let kinds = collect_kinds(b"foo(); Math.sin(1); this.bar(); a.b.c(); items[0]();\n");
        assert!(kinds.contains(&"call:foo".to_string()));
        assert!(kinds.contains(&"member:Math.sin".to_string()));
        assert_eq!(kinds.iter().filter(|k| *k == "call:?").count(), 3);
    }

    #[test]
    fn test_classify_jsx() {
        let kinds = collect_kinds(
            b"const a = <Animated.View><Text>hi</Text><><Canvas /></></Animated.View>;\n",
        );
        assert!(kinds.contains(&"open:Animated.View".to_string()));
        assert!(kinds.contains(&"open:Text".to_string()));
        assert!(kinds.contains(&"self:Canvas".to_string()));
        assert!(kinds.contains(&"fragment".to_string()));
    }

    #[test]
    fn test_classify_import() {
        let kinds = collect_kinds(b"import React from 'react';\n");
        assert_eq!(kinds, vec!["import".to_string()]);
    }
}
