//! Corpus-wide aggregation of metadata documents.
//!
//! Every stats run starts from nothing, reads all metadata documents, and
//! folds them into one [`AggregateStats`] document. Frequency maps count each
//! value once per project and are emitted in descending count order; ties
//! keep the order in which values were first seen.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::{debug, info};

use crate::config::ScanConfig;
use crate::error::{Result, ScanError};
use crate::metadata::AnimationMetadata;

/// Prefix of gesture-wrapped canvas components.
pub const TOUCHABLE_PREFIX: &str = "Touchable.";
/// Prefix of animated wrapper components.
pub const ANIMATED_PREFIX: &str = "Animated.";

/// Strip wrapper qualifiers from a component name.
///
/// `Touchable.X` and `Animated.X` become `X`; any other qualified name keeps
/// only its final segment.
pub fn normalize_component(name: &str) -> &str {
    if let Some(rest) = name.strip_prefix(TOUCHABLE_PREFIX) {
        rest
    } else if let Some(rest) = name.strip_prefix(ANIMATED_PREFIX) {
        rest
    } else if let Some((_, last)) = name.rsplit_once('.') {
        last
    } else {
        name
    }
}

fn is_wrapped_component(name: &str) -> bool {
    name.starts_with(TOUCHABLE_PREFIX) || name.starts_with(ANIMATED_PREFIX)
}

/// Name → count, serialized as a JSON object in stored order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyMap(Vec<(String, usize)>);

impl FrequencyMap {
    pub fn get(&self, name: &str) -> Option<usize> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, c)| *c)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.0.iter().map(|(n, c)| (n.as_str(), *c))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for FrequencyMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, count) in &self.0 {
            map.serialize_entry(name, count)?;
        }
        map.end()
    }
}

struct FrequencyMapVisitor(PhantomData<FrequencyMap>);

impl<'de> Visitor<'de> for FrequencyMapVisitor {
    type Value = FrequencyMap;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of names to counts")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<FrequencyMap, A::Error> {
        let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((name, count)) = access.next_entry::<String, usize>()? {
            entries.push((name, count));
        }
        Ok(FrequencyMap(entries))
    }
}

impl<'de> Deserialize<'de> for FrequencyMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(FrequencyMapVisitor(PhantomData))
    }
}

/// Insertion-ordered counter.
#[derive(Debug, Default)]
struct Counter {
    order: Vec<String>,
    counts: HashMap<String, usize>,
}

impl Counter {
    fn increment(&mut self, name: &str) {
        match self.counts.get_mut(name) {
            Some(count) => *count += 1,
            None => {
                self.order.push(name.to_string());
                self.counts.insert(name.to_string(), 1);
            }
        }
    }

    /// Descending by count; `sort_by` is stable, so ties keep first-seen order.
    fn into_sorted(self) -> FrequencyMap {
        let Counter { order, mut counts } = self;
        let mut entries: Vec<(String, usize)> = order
            .into_iter()
            .map(|name| {
                let count = counts.remove(&name).unwrap_or(0);
                (name, count)
            })
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        FrequencyMap(entries)
    }
}

/// One project's summary embedded in the aggregate for client-side filtering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationSummary {
    pub slug: String,
    pub content_hash: String,
    pub extracted_at: String,
    pub packages: Vec<String>,
    pub hooks: Vec<String>,
    pub functions: Vec<String>,
    pub components: Vec<String>,
    pub patterns: Vec<String>,
    pub techniques: Vec<String>,
}

impl From<&AnimationMetadata> for AnimationSummary {
    fn from(doc: &AnimationMetadata) -> Self {
        Self {
            slug: doc.slug.clone(),
            content_hash: doc.content_hash.clone(),
            extracted_at: doc.extracted_at.clone(),
            packages: doc.packages.clone(),
            hooks: doc.hooks.clone(),
            functions: doc.functions.clone(),
            components: doc.components.clone(),
            patterns: doc.patterns.clone(),
            techniques: doc.techniques.clone(),
        }
    }
}

/// Package → (name → count).
pub type PackageBreakdown = BTreeMap<String, FrequencyMap>;

/// Value → slugs of the projects that contain it.
pub type ReverseIndex = BTreeMap<String, Vec<String>>;

/// The aggregate statistics document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateStats {
    pub total_animations: usize,
    pub generated_at: String,
    pub packages: FrequencyMap,
    pub hooks: FrequencyMap,
    pub functions: FrequencyMap,
    pub components: FrequencyMap,
    pub patterns: FrequencyMap,
    pub techniques: FrequencyMap,
    pub packages_index: ReverseIndex,
    pub hooks_index: ReverseIndex,
    pub patterns_index: ReverseIndex,
    pub techniques_index: ReverseIndex,
    pub components_by_package: PackageBreakdown,
    pub hooks_by_package: PackageBreakdown,
    pub functions_by_package: PackageBreakdown,
    pub animations: Vec<AnimationSummary>,
}

/// Mutable fold state for one stats run.
pub struct StatsAggregator<'c> {
    config: &'c ScanConfig,
    total: usize,
    packages: Counter,
    hooks: Counter,
    functions: Counter,
    components: Counter,
    patterns: Counter,
    techniques: Counter,
    packages_index: ReverseIndex,
    hooks_index: ReverseIndex,
    patterns_index: ReverseIndex,
    techniques_index: ReverseIndex,
    components_by_package: BTreeMap<String, Counter>,
    hooks_by_package: BTreeMap<String, Counter>,
    functions_by_package: BTreeMap<String, Counter>,
    animations: Vec<AnimationSummary>,
}

impl<'c> StatsAggregator<'c> {
    pub fn new(config: &'c ScanConfig) -> Self {
        Self {
            config,
            total: 0,
            packages: Counter::default(),
            hooks: Counter::default(),
            functions: Counter::default(),
            components: Counter::default(),
            patterns: Counter::default(),
            techniques: Counter::default(),
            packages_index: ReverseIndex::new(),
            hooks_index: ReverseIndex::new(),
            patterns_index: ReverseIndex::new(),
            techniques_index: ReverseIndex::new(),
            components_by_package: BTreeMap::new(),
            hooks_by_package: BTreeMap::new(),
            functions_by_package: BTreeMap::new(),
            animations: Vec::new(),
        }
    }

    /// Fold one project's document.
    pub fn add(&mut self, doc: &AnimationMetadata) {
        self.total += 1;
        let slug = doc.slug.as_str();

        for package in unique(&doc.packages) {
            self.packages.increment(package);
            push_slug(&mut self.packages_index, package, slug);
        }
        for hook in unique(&doc.hooks) {
            self.hooks.increment(hook);
            push_slug(&mut self.hooks_index, hook, slug);
        }
        for function in unique(&doc.functions) {
            self.functions.increment(function);
        }
        for pattern in unique(&doc.patterns) {
            self.patterns.increment(pattern);
            push_slug(&mut self.patterns_index, pattern, slug);
        }
        for technique in unique(&doc.techniques) {
            self.techniques.increment(technique);
            push_slug(&mut self.techniques_index, technique, slug);
        }
        for component in unique(doc.components.iter().map(|c| normalize_component(c))) {
            self.components.increment(component);
        }

        for (package, detail) in &doc.packages_detail {
            for hook in unique(&detail.hooks) {
                counter_for(&mut self.hooks_by_package, package).increment(hook);
            }
            for function in unique(&detail.functions) {
                counter_for(&mut self.functions_by_package, package).increment(function);
            }
            for component in unique(detail.components.iter().map(|c| normalize_component(c))) {
                counter_for(&mut self.components_by_package, package).increment(component);
            }
        }

        self.backfill_canvas(doc);
        self.animations.push(AnimationSummary::from(doc));
        debug!(slug, "folded metadata");
    }

    /// Canvas components that only show up wrapped, plus the components the
    /// wrapper package renders on the project's behalf.
    fn backfill_canvas(&mut self, doc: &AnimationMetadata) {
        let canvas = self.config.canvas_package.as_str();
        let wrapper = self.config.canvas_wrapper_package.as_str();
        let uses_canvas = doc.packages.iter().any(|p| p == canvas);
        let uses_wrapper = doc.packages.iter().any(|p| p == wrapper);
        if !uses_canvas && !uses_wrapper {
            return;
        }

        let mut seen: HashSet<&str> = doc
            .packages_detail
            .get(canvas)
            .map(|d| d.components.iter().map(|c| normalize_component(c)).collect())
            .unwrap_or_default();
        let mut recovered: Vec<&str> = Vec::new();

        if uses_canvas {
            for component in &doc.components {
                if !is_wrapped_component(component) {
                    continue;
                }
                let name = normalize_component(component);
                if seen.insert(name) {
                    recovered.push(name);
                }
            }
        }

        if uses_wrapper {
            for name in &self.config.canvas_wrapper_components {
                if seen.insert(name.as_str()) {
                    recovered.push(name.as_str());
                }
            }
        }

        if recovered.is_empty() {
            return;
        }
        let counter = counter_for(&mut self.components_by_package, canvas);
        for name in recovered {
            counter.increment(name);
        }
    }

    /// Produce the sorted aggregate document.
    pub fn finish(self) -> AggregateStats {
        let mut animations = self.animations;
        animations.sort_by(|a, b| a.slug.cmp(&b.slug));

        AggregateStats {
            total_animations: self.total,
            generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            packages: self.packages.into_sorted(),
            hooks: self.hooks.into_sorted(),
            functions: self.functions.into_sorted(),
            components: self.components.into_sorted(),
            patterns: self.patterns.into_sorted(),
            techniques: self.techniques.into_sorted(),
            packages_index: self.packages_index,
            hooks_index: self.hooks_index,
            patterns_index: self.patterns_index,
            techniques_index: self.techniques_index,
            components_by_package: sort_breakdown(self.components_by_package),
            hooks_by_package: sort_breakdown(self.hooks_by_package),
            functions_by_package: sort_breakdown(self.functions_by_package),
            animations,
        }
    }
}

fn unique<'a, I, S>(values: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a S>,
    S: AsRef<str> + ?Sized + 'a,
{
    let mut seen = HashSet::new();
    values
        .into_iter()
        .map(|v| v.as_ref())
        .filter(|v| seen.insert(*v))
        .collect()
}

fn push_slug(index: &mut ReverseIndex, value: &str, slug: &str) {
    let slugs = index.entry(value.to_string()).or_default();
    if !slugs.iter().any(|s| s == slug) {
        slugs.push(slug.to_string());
    }
}

fn counter_for<'m>(map: &'m mut BTreeMap<String, Counter>, package: &str) -> &'m mut Counter {
    map.entry(package.to_string()).or_default()
}

fn sort_breakdown(map: BTreeMap<String, Counter>) -> PackageBreakdown {
    map.into_iter()
        .map(|(package, counter)| (package, counter.into_sorted()))
        .collect()
}

/// List metadata documents in `dir`, sorted by file name.
///
/// `exclude` names a file to skip, for when the aggregate is written into
/// the same directory.
pub fn list_metadata_files(dir: &Path, exclude: Option<&Path>) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(ScanError::MetadataDirNotFound(dir.to_path_buf()));
    }
    let entries = fs::read_dir(dir).map_err(|source| ScanError::Read {
        path: dir.to_path_buf(),
        source,
    })?;

    let exclude_name = exclude.and_then(|p| p.file_name());
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| ScanError::Read {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if !path.is_file() || path.extension().map(|e| e != "json").unwrap_or(true) {
            continue;
        }
        if exclude_name.is_some() && path.file_name() == exclude_name {
            continue;
        }
        files.push(path);
    }
    files.sort();
    Ok(files)
}

/// Read every metadata document in `dir` and fold them.
pub fn aggregate_dir(dir: &Path, config: &ScanConfig, exclude: Option<&Path>) -> Result<AggregateStats> {
    let files = list_metadata_files(dir, exclude)?;
    let mut aggregator = StatsAggregator::new(config);
    for path in &files {
        let doc = AnimationMetadata::read(path)?;
        aggregator.add(&doc);
    }
    let stats = aggregator.finish();
    info!(
        documents = stats.total_animations,
        packages = stats.packages.len(),
        components = stats.components.len(),
        "aggregated metadata"
    );
    Ok(stats)
}
