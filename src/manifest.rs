//! Version manifest lookup for `packages_with_versions`.
//!
//! The manifest is a `package.json`-shaped document; versions are taken from
//! `dependencies`, then `devDependencies`, then `peerDependencies`.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::{Result, ScanError};

/// Version reported for packages the manifest does not list.
pub const UNKNOWN_VERSION: &str = "unknown";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PackageJson {
    #[serde(default)]
    dependencies: BTreeMap<String, String>,
    #[serde(default)]
    dev_dependencies: BTreeMap<String, String>,
    #[serde(default)]
    peer_dependencies: BTreeMap<String, String>,
}

/// Package → declared version.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionManifest {
    versions: BTreeMap<String, String>,
}

impl VersionManifest {
    /// Load a manifest file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ScanError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let parsed: PackageJson = serde_json::from_str(&content).map_err(|source| ScanError::Json {
            path: path.to_path_buf(),
            source,
        })?;

        let mut versions = BTreeMap::new();
        for table in [
            parsed.dependencies,
            parsed.dev_dependencies,
            parsed.peer_dependencies,
        ] {
            for (name, version) in table {
                versions.entry(name).or_insert(version);
            }
        }
        Ok(Self { versions })
    }

    pub fn version_of(&self, package: &str) -> Option<&str> {
        self.versions.get(package).map(String::as_str)
    }

    /// Map each package to its version, or [`UNKNOWN_VERSION`].
    pub fn resolve<'a, I>(&self, packages: I) -> BTreeMap<String, String>
    where
        I: IntoIterator<Item = &'a String>,
    {
        packages
            .into_iter()
            .map(|p| {
                let version = self.version_of(p).unwrap_or(UNKNOWN_VERSION);
                (p.clone(), version.to_string())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_and_resolve() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("package.json");
        fs::write(
            &path,
            r#"{
  "name": "corpus",
  "dependencies": { "react-native-reanimated": "~3.10.1" },
  "devDependencies": { "typescript": "^5.3.0", "react-native-reanimated": "0.0.1" }
}"#,
        )
        .unwrap();

        let manifest = VersionManifest::load(&path).unwrap();
        assert_eq!(
            manifest.version_of("react-native-reanimated"),
            Some("~3.10.1")
        );

        let packages = vec!["react-native-reanimated".to_string(), "lib-x".to_string()];
        let resolved = manifest.resolve(&packages);
        assert_eq!(resolved["react-native-reanimated"], "~3.10.1");
        assert_eq!(resolved["lib-x"], UNKNOWN_VERSION);
    }

    #[test]
    fn test_default_manifest_reports_unknown() {
        let packages = vec!["react".to_string()];
        let resolved = VersionManifest::default().resolve(&packages);
        assert_eq!(resolved["react"], UNKNOWN_VERSION);
    }
}
