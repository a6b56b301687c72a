//! Package attribution by reverse import lookup.
//!
//! Two lookup tables are built from a project's runtime imports:
//!
//! - `item_to_package`: default and named local bindings → package
//! - `namespace_to_package`: `* as X` aliases → package
//!
//! When two packages bind the same name, the package whose specifier sorts
//! first keeps it. Names with no owning package are left unattributed; a
//! qualified `X.M` never falls back to `X` as an imported item.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::config::ScanConfig;
use crate::extract::FileFacts;

/// What a project uses from one package.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageDetail {
    #[serde(default)]
    pub imports: Vec<String>,
    #[serde(default)]
    pub hooks: Vec<String>,
    #[serde(default)]
    pub functions: Vec<String>,
    #[serde(default)]
    pub components: Vec<String>,
}

/// Package → detail, keyed in sorted order.
pub type PackagesDetail = BTreeMap<String, PackageDetail>;

/// Reverse lookup from bound names to packages.
pub struct PackageAttributor<'c> {
    config: &'c ScanConfig,
    item_to_package: HashMap<String, String>,
    namespace_to_package: HashMap<String, String>,
}

impl<'c> PackageAttributor<'c> {
    /// Build lookup tables from project facts whose relative specifiers have
    /// already been removed.
    pub fn new(facts: &FileFacts, config: &'c ScanConfig) -> Self {
        let mut item_to_package = HashMap::new();
        let mut namespace_to_package = HashMap::new();

        for package in &facts.modules {
            let items = facts
                .default_imports
                .get(package)
                .into_iter()
                .chain(facts.named_imports.get(package))
                .flatten();
            for item in items {
                item_to_package
                    .entry(item.clone())
                    .or_insert_with(|| package.clone());
            }

            for alias in facts.namespace_imports.get(package).into_iter().flatten() {
                namespace_to_package
                    .entry(alias.clone())
                    .or_insert_with(|| package.clone());
            }
        }

        Self {
            config,
            item_to_package,
            namespace_to_package,
        }
    }

    /// Package that bound `name` as a default or named import.
    pub fn package_for_item(&self, name: &str) -> Option<&str> {
        self.item_to_package.get(name).map(String::as_str)
    }

    /// Package that bound `alias` as a namespace import.
    pub fn package_for_namespace(&self, alias: &str) -> Option<&str> {
        self.namespace_to_package.get(alias).map(String::as_str)
    }

    /// Components: animated-namespace members go straight to the animation
    /// package; `X.M` resolves `X` as a namespace alias.
    fn package_for_component<'a>(&'a self, name: &str) -> Option<&'a str> {
        match qualifier(name) {
            Some(q) if q == self.config.animation_namespace => {
                Some(self.config.animation_package.as_str())
            }
            Some(q) => self.package_for_namespace(q),
            None => self.package_for_item(name),
        }
    }

    /// Build `packages_detail` for a project.
    pub fn attribute(&self, facts: &FileFacts) -> PackagesDetail {
        let mut detail = PackagesDetail::new();

        for package in &facts.modules {
            let mut imports = BTreeSet::new();
            for map in [
                &facts.default_imports,
                &facts.named_imports,
                &facts.namespace_imports,
            ] {
                if let Some(names) = map.get(package) {
                    imports.extend(names.iter().cloned());
                }
            }
            detail.insert(
                package.clone(),
                PackageDetail {
                    imports: imports.into_iter().collect(),
                    ..Default::default()
                },
            );
        }

        for hook in &facts.hooks {
            if let Some(package) = self.package_for_item(hook) {
                push_unique(&mut detail.entry(package.to_string()).or_default().hooks, hook);
            }
        }

        for function in &facts.functions {
            if let Some(package) = self.package_for_item(function) {
                push_unique(
                    &mut detail.entry(package.to_string()).or_default().functions,
                    function,
                );
            }
        }

        for (namespace, methods) in &facts.namespace_calls {
            if let Some(package) = self.package_for_namespace(namespace) {
                let entry = detail.entry(package.to_string()).or_default();
                for method in methods {
                    push_unique(&mut entry.functions, method);
                }
            }
        }

        for component in &facts.components {
            if let Some(package) = self.package_for_component(component) {
                push_unique(
                    &mut detail.entry(package.to_string()).or_default().components,
                    component,
                );
            }
        }

        detail
    }
}

fn qualifier(name: &str) -> Option<&str> {
    name.split_once('.').map(|(q, _)| q)
}

fn push_unique(list: &mut Vec<String>, name: &str) {
    if !list.iter().any(|n| n == name) {
        list.push(name.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract_file;
    use crate::parser::{parse_source, SourceLanguage};

    fn detail_for(source: &str) -> PackagesDetail {
        let config = ScanConfig::default();
        let parsed = parse_source("t.tsx", SourceLanguage::Tsx, source.as_bytes()).unwrap();
        let mut facts = extract_file(&parsed, &config);
        facts.retain_packages();
        PackageAttributor::new(&facts, &config).attribute(&facts)
    }

    #[test]
    fn test_hooks_and_functions_by_item() {
        let detail = detail_for(
            r#"
import { useSharedValue, withTiming } from 'lib-x';
import Animated from 'react-native-reanimated';
const v = useSharedValue(0);
v.value = withTiming(1);
const el = <Animated.View />;
"#,
        );
        assert_eq!(detail["lib-x"].hooks, vec!["useSharedValue"]);
        assert_eq!(detail["lib-x"].functions, vec!["withTiming"]);
        assert_eq!(detail["lib-x"].imports, vec!["useSharedValue", "withTiming"]);
        assert_eq!(
            detail["react-native-reanimated"].components,
            vec!["Animated.View"]
        );
    }

    #[test]
    fn test_animated_namespace_bypasses_lookup() {
        let detail = detail_for("const el = <Animated.Text />;\n");
        assert_eq!(
            detail["react-native-reanimated"].components,
            vec!["Animated.Text"]
        );
    }

    #[test]
    fn test_namespace_calls_append_methods() {
        let detail = detail_for(
            r#"
import * as Haptics from 'expo-haptics';
Haptics.impactAsync();
Haptics.selectionAsync();
Haptics.impactAsync();
"#,
        );
        assert_eq!(
            detail["expo-haptics"].functions,
            vec!["impactAsync", "selectionAsync"]
        );
        assert_eq!(detail["expo-haptics"].imports, vec!["Haptics"]);
    }

    #[test]
    fn test_qualified_name_without_namespace_is_unattributed() {
        let detail = detail_for(
            r#"
import React from 'react';
import { Gesture, GestureDetector } from 'react-native-gesture-handler';
import Touchable from 'react-native-skia-gesture';
const pan = Gesture.Pan();
const cb = React.useCallback(() => {}, []);
const el = <GestureDetector gesture={pan}><Touchable.Canvas /></GestureDetector>;
"#,
        );
        let rngh = &detail["react-native-gesture-handler"];
        assert!(rngh.functions.is_empty());
        assert_eq!(rngh.components, vec!["GestureDetector"]);
        assert!(detail["react"].functions.is_empty());
        assert!(detail["react"].hooks.is_empty());
        assert!(detail["react-native-skia-gesture"].components.is_empty());
    }

    #[test]
    fn test_qualified_component_via_namespace_alias() {
        let detail = detail_for(
            r#"
import * as Svg from 'react-native-svg';
const el = <Svg.Path d="M0 0" />;
"#,
        );
        assert_eq!(detail["react-native-svg"].components, vec!["Svg.Path"]);
    }

    #[test]
    fn test_components_by_local_binding() {
        let detail = detail_for(
            r#"
import { Canvas } from 'b-canvas';
import { Canvas as C2, Circle } from 'a-canvas';
import { Canvas as Canvas3 } from 'c-canvas';
const el = <Canvas><Circle /></Canvas>;
"#,
        );
        assert_eq!(detail["b-canvas"].components, vec!["Canvas"]);
        assert_eq!(detail["a-canvas"].components, vec!["Circle"]);
        assert!(detail["c-canvas"].components.is_empty());
    }

    #[test]
    fn test_shared_name_resolves_to_first_specifier() {
        let config = ScanConfig::default();
        let mut facts = FileFacts::new();
        for package in ["zeta", "alpha"] {
            facts.modules.insert(package.to_string());
            FileFacts::add_import(&mut facts.named_imports, package, "Shared");
        }
        let attributor = PackageAttributor::new(&facts, &config);
        assert_eq!(attributor.package_for_item("Shared"), Some("alpha"));
    }

    #[test]
    fn test_unattributed_names_are_dropped() {
        let detail = detail_for(
            r#"
import { useState } from 'react';
const [a] = useState(0);
useLocalThing();
helper();
"#,
        );
        assert_eq!(detail.len(), 1);
        assert_eq!(detail["react"].hooks, vec!["useState"]);
        assert!(detail["react"].functions.is_empty());
    }

    #[test]
    fn test_type_imports_not_attributed() {
        let source = r#"
import { type Thing } from 'types-pkg';
Thing();
"#;
        let detail = detail_for(source);
        assert!(detail["types-pkg"].functions.is_empty());
        assert!(detail["types-pkg"].imports.is_empty());
    }
}
