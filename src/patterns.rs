//! Rule-based detection of animation patterns and techniques.
//!
//! Every rule in [`PATTERN_RULES`] is evaluated, in table order, against the
//! project's hook, function and component sets. A matching rule appends its
//! tags. Output order is emission order, so the table order is part of the
//! output format.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A membership test over a project's usage sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    Hook(&'static str),
    Function(&'static str),
    Component(&'static str),
    Both(&'static Condition, &'static Condition),
}

impl Condition {
    fn holds(&self, usage: &Usage) -> bool {
        match self {
            Condition::Hook(name) => usage.hooks.contains(*name),
            Condition::Function(name) => usage.functions.contains(*name),
            Condition::Component(name) => usage.components.contains(*name),
            Condition::Both(a, b) => a.holds(usage) && b.holds(usage),
        }
    }
}

/// One row of the rule table.
#[derive(Debug, Clone, Copy)]
pub struct PatternRule {
    pub when: Condition,
    pub patterns: &'static [&'static str],
    pub techniques: &'static [&'static str],
}

/// The rule table.
pub static PATTERN_RULES: &[PatternRule] = &[
    PatternRule {
        when: Condition::Hook("useSharedValue"),
        patterns: &["shared-value-state"],
        techniques: &[],
    },
    PatternRule {
        when: Condition::Function("withTiming"),
        patterns: &["timing-animation"],
        techniques: &[],
    },
    PatternRule {
        when: Condition::Function("withSpring"),
        patterns: &["spring-physics"],
        techniques: &[],
    },
    PatternRule {
        when: Condition::Function("withDecay"),
        patterns: &["decay-animation"],
        techniques: &["momentum-scrolling"],
    },
    PatternRule {
        when: Condition::Function("withRepeat"),
        patterns: &["looping-animation"],
        techniques: &[],
    },
    PatternRule {
        when: Condition::Function("withSequence"),
        patterns: &["sequenced-animation"],
        techniques: &[],
    },
    PatternRule {
        when: Condition::Function("withDelay"),
        patterns: &["staggered-timing"],
        techniques: &[],
    },
    PatternRule {
        when: Condition::Hook("useAnimatedStyle"),
        patterns: &["animated-style"],
        techniques: &[],
    },
    PatternRule {
        when: Condition::Hook("useDerivedValue"),
        patterns: &["derived-values"],
        techniques: &[],
    },
    PatternRule {
        when: Condition::Function("interpolate"),
        patterns: &["interpolation"],
        techniques: &["value-mapping"],
    },
    PatternRule {
        when: Condition::Function("interpolateColor"),
        patterns: &["color-interpolation"],
        techniques: &[],
    },
    PatternRule {
        when: Condition::Hook("useAnimatedScrollHandler"),
        patterns: &["scroll-driven"],
        techniques: &["scroll-handler"],
    },
    PatternRule {
        when: Condition::Component("GestureDetector"),
        patterns: &["gesture-driven"],
        techniques: &[],
    },
    PatternRule {
        when: Condition::Function("Gesture.Pan"),
        patterns: &[],
        techniques: &["pan-gesture"],
    },
    PatternRule {
        when: Condition::Component("Canvas"),
        patterns: &["skia-rendering"],
        techniques: &["canvas-drawing"],
    },
    PatternRule {
        when: Condition::Hook("useFrameCallback"),
        patterns: &["frame-callback"],
        techniques: &["frame-loop"],
    },
    PatternRule {
        when: Condition::Both(
            &Condition::Function("withSpring"),
            &Condition::Component("GestureDetector"),
        ),
        patterns: &[],
        techniques: &["gesture-spring-release"],
    },
    PatternRule {
        when: Condition::Both(
            &Condition::Function("withRepeat"),
            &Condition::Function("withSequence"),
        ),
        patterns: &[],
        techniques: &["choreographed-loop"],
    },
];

/// The usage sets rules are evaluated against.
pub struct Usage<'a> {
    pub hooks: &'a BTreeSet<String>,
    pub functions: &'a BTreeSet<String>,
    pub components: &'a BTreeSet<String>,
}

/// Tags emitted by the rule table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedPatterns {
    pub patterns: Vec<String>,
    pub techniques: Vec<String>,
}

/// Evaluate every rule in order.
pub fn detect_patterns(usage: &Usage) -> DetectedPatterns {
    detect_with_rules(usage, PATTERN_RULES)
}

/// Evaluate a custom rule table in order.
pub fn detect_with_rules(usage: &Usage, rules: &[PatternRule]) -> DetectedPatterns {
    let mut detected = DetectedPatterns::default();
    for rule in rules {
        if !rule.when.holds(usage) {
            continue;
        }
        for tag in rule.patterns {
            push_unique(&mut detected.patterns, tag);
        }
        for tag in rule.techniques {
            push_unique(&mut detected.techniques, tag);
        }
    }
    detected
}

fn push_unique(list: &mut Vec<String>, tag: &str) {
    if !list.iter().any(|t| t == tag) {
        list.push(tag.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn detect(hooks: &[&str], functions: &[&str], components: &[&str]) -> DetectedPatterns {
        let (h, f, c) = (set(hooks), set(functions), set(components));
        detect_patterns(&Usage {
            hooks: &h,
            functions: &f,
            components: &c,
        })
    }

    #[test]
    fn test_table_size() {
        assert_eq!(PATTERN_RULES.len(), 18);
    }

    #[test]
    fn test_shared_value_and_timing() {
        let detected = detect(&["useSharedValue"], &["withTiming"], &["Animated.View"]);
        assert_eq!(
            detected.patterns,
            vec!["shared-value-state", "timing-animation"]
        );
        assert!(detected.techniques.is_empty());
    }

    #[test]
    fn test_emission_order_is_table_order() {
        let detected = detect(
            &["useFrameCallback", "useSharedValue"],
            &["withSequence", "withRepeat", "interpolate"],
            &["Canvas"],
        );
        assert_eq!(
            detected.patterns,
            vec![
                "shared-value-state",
                "looping-animation",
                "sequenced-animation",
                "interpolation",
                "skia-rendering",
                "frame-callback",
            ]
        );
        assert_eq!(
            detected.techniques,
            vec!["value-mapping", "canvas-drawing", "frame-loop", "choreographed-loop"]
        );
    }

    #[test]
    fn test_conjunction_requires_both() {
        let only_spring = detect(&[], &["withSpring"], &[]);
        assert!(!only_spring
            .techniques
            .contains(&"gesture-spring-release".to_string()));

        let both = detect(&[], &["withSpring", "Gesture.Pan"], &["GestureDetector"]);
        assert_eq!(
            both.patterns,
            vec!["spring-physics", "gesture-driven"]
        );
        assert_eq!(both.techniques, vec!["pan-gesture", "gesture-spring-release"]);
    }

    #[test]
    fn test_deterministic() {
        let a = detect(&["useAnimatedStyle"], &["withDecay"], &["GestureDetector"]);
        let b = detect(&["useAnimatedStyle"], &["withDecay"], &["GestureDetector"]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_custom_rules_dedup() {
        static RULES: &[PatternRule] = &[
            PatternRule {
                when: Condition::Hook("useA"),
                patterns: &["shared"],
                techniques: &[],
            },
            PatternRule {
                when: Condition::Hook("useB"),
                patterns: &["shared"],
                techniques: &["b"],
            },
        ];
        let (h, f, c) = (set(&["useA", "useB"]), set(&[]), set(&[]));
        let detected = detect_with_rules(
            &Usage {
                hooks: &h,
                functions: &f,
                components: &c,
            },
            RULES,
        );
        assert_eq!(detected.patterns, vec!["shared"]);
        assert_eq!(detected.techniques, vec!["b"]);
    }
}
