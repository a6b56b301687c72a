//! Classification of project files into structural categories.

use serde::{Deserialize, Serialize};

/// Structural category of a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileCategory {
    Entry,
    Components,
    Hooks,
    Utils,
    Types,
    Constants,
    Other,
}

impl FileCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileCategory::Entry => "entry",
            FileCategory::Components => "components",
            FileCategory::Hooks => "hooks",
            FileCategory::Utils => "utils",
            FileCategory::Types => "types",
            FileCategory::Constants => "constants",
            FileCategory::Other => "other",
        }
    }
}

impl std::fmt::Display for FileCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Categorized relative paths of a project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileStructure {
    #[serde(default)]
    pub entry: Vec<String>,
    #[serde(default)]
    pub components: Vec<String>,
    #[serde(default)]
    pub hooks: Vec<String>,
    #[serde(default)]
    pub utils: Vec<String>,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub constants: Vec<String>,
    #[serde(default)]
    pub other: Vec<String>,
}

impl FileStructure {
    /// Build from `/`-separated relative paths.
    pub fn from_paths<'a, I>(paths: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut structure = Self::default();
        for path in paths {
            structure.bucket_mut(classify_path(path)).push(path.to_string());
        }
        for bucket in [
            &mut structure.entry,
            &mut structure.components,
            &mut structure.hooks,
            &mut structure.utils,
            &mut structure.types,
            &mut structure.constants,
            &mut structure.other,
        ] {
            bucket.sort();
            bucket.dedup();
        }
        structure
    }

    fn bucket_mut(&mut self, category: FileCategory) -> &mut Vec<String> {
        match category {
            FileCategory::Entry => &mut self.entry,
            FileCategory::Components => &mut self.components,
            FileCategory::Hooks => &mut self.hooks,
            FileCategory::Utils => &mut self.utils,
            FileCategory::Types => &mut self.types,
            FileCategory::Constants => &mut self.constants,
            FileCategory::Other => &mut self.other,
        }
    }

    pub fn len(&self) -> usize {
        self.entry.len()
            + self.components.len()
            + self.hooks.len()
            + self.utils.len()
            + self.types.len()
            + self.constants.len()
            + self.other.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Classify one relative path. The first matching rule wins:
///
/// 1. stem `index` → entry
/// 2. directory contains "components", or the file is at the root → components
/// 3. directory contains "hooks" → hooks
/// 4. directory contains "utils" → utils
/// 5. directory or file name contains "types" → types
/// 6. directory or file name contains "constants" → constants
/// 7. other
pub fn classify_path(relative: &str) -> FileCategory {
    let (dir, file_name) = match relative.rfind('/') {
        Some(i) => (&relative[..i], &relative[i + 1..]),
        None => ("", relative),
    };
    let stem = file_name.split('.').next().unwrap_or(file_name);

    if stem == "index" {
        FileCategory::Entry
    } else if dir.contains("components") || dir.is_empty() {
        FileCategory::Components
    } else if dir.contains("hooks") {
        FileCategory::Hooks
    } else if dir.contains("utils") {
        FileCategory::Utils
    } else if dir.contains("types") || file_name.contains("types") {
        FileCategory::Types
    } else if dir.contains("constants") || file_name.contains("constants") {
        FileCategory::Constants
    } else {
        FileCategory::Other
    }
}
