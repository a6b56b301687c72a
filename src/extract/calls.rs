//! Call expression and JSX element extraction.

use tree_sitter::Node;

use super::{Extractor, FileFacts};
use crate::config::ScanConfig;
use crate::parser::{CalleeShape, NodeKind, ParsedFile};

/// How a single call name is classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Hook,
    Function,
    Component,
    Ignored,
}

/// Classify a callee.
///
/// Plain identifiers: `use*` is a hook, `with*` is always a function, names
/// in the exclusion table are ignored, anything else is a function.
///
/// `X.M`: members of the animation namespace are components; otherwise the
/// call is a function unless `M` is excluded.
pub fn classify_call(callee: CalleeShape, config: &ScanConfig) -> CallKind {
    match callee {
        CalleeShape::Identifier(name) => {
            if name.starts_with("use") {
                CallKind::Hook
            } else if name.starts_with("with") {
                CallKind::Function
            } else if config.is_excluded_call(name) {
                CallKind::Ignored
            } else {
                CallKind::Function
            }
        }
        CalleeShape::Member { object, property } => {
            if object == config.animation_namespace {
                CallKind::Component
            } else if config.is_excluded_call(property) {
                CallKind::Ignored
            } else {
                CallKind::Function
            }
        }
        CalleeShape::Unsupported => CallKind::Ignored,
    }
}

/// Collects hooks, functions, components and namespace calls.
pub struct CallExtractor<'c> {
    config: &'c ScanConfig,
}

impl<'c> CallExtractor<'c> {
    pub fn new(config: &'c ScanConfig) -> Self {
        Self { config }
    }

    fn record_call(&self, callee: CalleeShape, facts: &mut FileFacts) {
        let name = match callee {
            CalleeShape::Identifier(name) => name.to_string(),
            CalleeShape::Member { object, property } => {
                facts
                    .namespace_calls
                    .entry(object.to_string())
                    .or_default()
                    .insert(property.to_string());
                format!("{}.{}", object, property)
            }
            CalleeShape::Unsupported => return,
        };

        match classify_call(callee, self.config) {
            CallKind::Hook => {
                facts.hooks.insert(name);
            }
            CallKind::Function => {
                facts.functions.insert(name);
            }
            CallKind::Component => {
                facts.components.insert(name);
            }
            CallKind::Ignored => {}
        }
    }
}

impl Extractor for CallExtractor<'_> {
    fn visit(&self, _node: Node, kind: NodeKind, _parsed: &ParsedFile, facts: &mut FileFacts) {
        match kind {
            NodeKind::CallExpression(callee) => self.record_call(callee, facts),
            NodeKind::JsxOpeningElement(Some(tag)) | NodeKind::JsxSelfClosingElement(Some(tag)) => {
                facts.components.insert(tag.to_string());
            }
            NodeKind::JsxOpeningElement(None)
            | NodeKind::JsxSelfClosingElement(None)
            | NodeKind::ImportStatement
            | NodeKind::Other => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::walk;
    use crate::parser::{parse_source, SourceLanguage};

    fn calls_of(source: &str) -> FileFacts {
        let config = ScanConfig::default();
        let parsed = parse_source("t.tsx", SourceLanguage::Tsx, source.as_bytes()).unwrap();
        walk(&parsed, &[&CallExtractor::new(&config)])
    }

    #[test]
    fn test_prefix_classification() {
        let config = ScanConfig::default();
        assert_eq!(
            classify_call(CalleeShape::Identifier("useFoo"), &config),
            CallKind::Hook
        );
        assert_eq!(
            classify_call(CalleeShape::Identifier("withTiming"), &config),
            CallKind::Function
        );
        assert_eq!(
            classify_call(CalleeShape::Identifier("map"), &config),
            CallKind::Ignored
        );
        assert_eq!(
            classify_call(CalleeShape::Identifier("interpolate"), &config),
            CallKind::Function
        );
    }

    #[test]
    fn test_with_prefix_beats_exclusion() {
        let config = ScanConfig {
            excluded_calls: ["withMap".to_string(), "useThing".to_string()]
                .into_iter()
                .collect(),
            ..Default::default()
        };
        assert_eq!(
            classify_call(CalleeShape::Identifier("withMap"), &config),
            CallKind::Function
        );
        assert_eq!(
            classify_call(CalleeShape::Identifier("useThing"), &config),
            CallKind::Hook
        );
    }

    #[test]
    fn test_member_classification() {
        let config = ScanConfig::default();
        assert_eq!(
            classify_call(
                CalleeShape::Member {
                    object: "Something",
                    property: "map"
                },
                &config
            ),
            CallKind::Ignored
        );
        assert_eq!(
            classify_call(
                CalleeShape::Member {
                    object: "Animated",
                    property: "createAnimatedComponent"
                },
                &config
            ),
            CallKind::Component
        );
        assert_eq!(
            classify_call(
                CalleeShape::Member {
                    object: "Gesture",
                    property: "Pan"
                },
                &config
            ),
            CallKind::Function
        );
    }

    #[test]
    fn test_extracts_calls_and_namespace_map() {
        let facts = calls_of(
            r#"
const offset = useSharedValue(0);
const pan = Gesture.Pan().onEnd(() => {
  offset.value = withSpring(0);
});
const AnimatedPath = Animated.createAnimatedComponent(Path);
items.map((i) => i);
console.log(Math.atan2(1, 2));
map(items);
"#,
        );

        assert_eq!(facts.hooks.iter().collect::<Vec<_>>(), vec!["useSharedValue"]);
        assert!(facts.functions.contains("Gesture.Pan"));
        assert!(facts.functions.contains("withSpring"));
        assert!(facts.functions.contains("Math.atan2"));
        assert!(!facts.functions.contains("map"));
        assert!(!facts.functions.contains("items.map"));
        assert!(!facts.functions.contains("console.log"));
        assert!(facts.components.contains("Animated.createAnimatedComponent"));

        assert!(facts.namespace_calls["items"].contains("map"));
        assert!(facts.namespace_calls["console"].contains("log"));
        assert!(facts.namespace_calls["Gesture"].contains("Pan"));
    }

    #[test]
    fn test_jsx_components() {
        let facts = calls_of(
            r#"
export default function Scene() {
  return (
    <GestureDetector gesture={pan}>
      <Animated.View>
        <Canvas style={{ flex: 1 }}>
          <Circle cx={10} cy={10} r={5} />
        </Canvas>
      </Animated.View>
    </GestureDetector>
  );
}
"#,
        );
        let components: Vec<_> = facts.components.iter().map(String::as_str).collect();
        assert_eq!(
            components,
            vec!["Animated.View", "Canvas", "Circle", "GestureDetector"]
        );
    }
}
