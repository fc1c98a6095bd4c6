// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// Core include/exclude decision logic

use once_cell::sync::OnceCell;
use std::sync::Arc;
use tracing::{debug, trace};

use super::cache::PatternCache;
use super::config::{FilterConfig, RuleKind};
use super::error::Result;
use super::normalize::{canonicalize, query_path, strip_array_indices};
use super::patterns::CompiledRule;
use super::rules::RuleSet;

/// Decides, field by field, whether a value should be serialized
///
/// Rules are dotted paths such as `foo.bar`, optionally holding `*`
/// wildcards. Excludes always win over includes. An empty include set
/// admits every field that is not excluded. An included deep path keeps its
/// ancestors visible, so `foo.bar.zee` also admits `foo` and `foo.bar`.
///
/// # Example
/// ```
/// use json_path_filter::PathFilter;
///
/// let mut filter = PathFilter::new();
/// filter.add_includes(["bar.zee"]);
///
/// assert!(filter.apply("$", "bar").unwrap());
/// assert!(filter.apply("$.bar", "zee").unwrap());
/// assert!(!filter.apply("$.bar", "other").unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct PathFilter {
    includes: RuleSet,
    excludes: RuleSet,
    full_paths: Vec<String>,
    cache: Arc<PatternCache>,
    compiled_includes: OnceCell<Arc<[CompiledRule]>>,
    compiled_excludes: OnceCell<Arc<[CompiledRule]>>,
}

impl Default for PathFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl PathFilter {
    /// Empty filter backed by the process-wide pattern cache
    pub fn new() -> Self {
        Self::with_cache(PatternCache::global())
    }

    /// Empty filter backed by the given pattern cache
    pub fn with_cache(cache: Arc<PatternCache>) -> Self {
        Self {
            includes: RuleSet::new(),
            excludes: RuleSet::new(),
            full_paths: Vec::new(),
            cache,
            compiled_includes: OnceCell::new(),
            compiled_excludes: OnceCell::new(),
        }
    }

    /// Filter exporting only the given properties
    pub fn with_includes<I, S>(properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut filter = Self::new();
        filter.add_includes(properties);
        filter
    }

    /// Filter built from configuration, with a cache of its own
    pub fn from_config(config: &FilterConfig) -> Self {
        let mut filter = Self::with_cache(Arc::new(PatternCache::new(config.cache.clone())));
        filter.add_includes(&config.includes);
        filter.add_excludes(&config.excludes);
        filter
    }

    /// Add names/paths of properties to export
    ///
    /// Each string may hold several properties separated by `,`, `;` or `:`.
    /// Multi-level paths use `.` or `/`, e.g. `foo/bar` or `foo.bar`.
    pub fn add_includes<I, S>(&mut self, properties: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.add_to(RuleKind::Include, properties)
    }

    /// Add names/paths of properties to ban
    ///
    /// Accepts the same syntax as [`PathFilter::add_includes`].
    pub fn add_excludes<I, S>(&mut self, properties: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.add_to(RuleKind::Exclude, properties)
    }

    /// Replace the index of full paths present in the current target
    pub fn set_full_paths<I, S>(&mut self, paths: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.full_paths.clear();
        self.full_paths.extend(paths.into_iter().map(|p| {
            let canonical = canonicalize(p.as_ref()).into_owned();
            strip_array_indices(&canonical).into_owned()
        }));
        debug!("Full path index replaced with {} paths", self.full_paths.len());
    }

    pub fn includes(&self) -> &RuleSet {
        &self.includes
    }

    pub fn excludes(&self) -> &RuleSet {
        &self.excludes
    }

    pub fn full_paths(&self) -> &[String] {
        &self.full_paths
    }

    /// Compile both rule sets now instead of at first match
    pub fn validate(&self) -> Result<()> {
        self.compiled(RuleKind::Exclude)?;
        self.compiled(RuleKind::Include)?;
        Ok(())
    }

    /// Should the field `name` under `context_path` be serialized?
    ///
    /// `context_path` is the serializer's location, root-prefixed, e.g.
    /// `$.bar[2].zee`. When the owning source object is absent the field is
    /// always kept.
    pub fn decide(&self, context_path: &str, name: &str, source_present: bool) -> Result<bool> {
        if !source_present {
            return Ok(true);
        }

        let path = query_path(context_path, name);
        let keep = self.decide_path(&path)?;
        trace!(path = %path, keep, "Path filter decision");
        Ok(keep)
    }

    /// [`PathFilter::decide`] for a field whose source object is present
    pub fn apply(&self, context_path: &str, name: &str) -> Result<bool> {
        self.decide(context_path, name, true)
    }

    /// Decision for an already root-relative, index-free path
    pub fn decide_path(&self, path: &str) -> Result<bool> {
        if self.matches(RuleKind::Exclude, path)? {
            return Ok(false);
        }
        if self.includes.is_empty() {
            return Ok(true);
        }
        self.matches(RuleKind::Include, path)
    }

    fn add_to<I, S>(&mut self, kind: RuleKind, properties: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let (rules, compiled) = match kind {
            RuleKind::Include => (&mut self.includes, &mut self.compiled_includes),
            RuleKind::Exclude => (&mut self.excludes, &mut self.compiled_excludes),
        };

        let added = rules.extend(properties);
        if added > 0 {
            compiled.take();
            debug!(
                "Added {} {} rules ({} total)",
                added,
                kind.as_str(),
                rules.len()
            );
        }
        self
    }

    fn rules(&self, kind: RuleKind) -> &RuleSet {
        match kind {
            RuleKind::Include => &self.includes,
            RuleKind::Exclude => &self.excludes,
        }
    }

    fn compiled(&self, kind: RuleKind) -> Result<&Arc<[CompiledRule]>> {
        let cell = match kind {
            RuleKind::Include => &self.compiled_includes,
            RuleKind::Exclude => &self.compiled_excludes,
        };
        cell.get_or_try_init(|| self.cache.get_or_compile(self.rules(kind)))
    }

    fn matches(&self, kind: RuleKind, path: &str) -> Result<bool> {
        let rules = self.rules(kind);
        if rules.contains(path) {
            return Ok(true);
        }

        // one wildcard anywhere puts the whole set in pattern mode, which
        // disables prefix matching for its literal members too
        if rules.has_pattern() {
            return self.pattern_matches(kind, path);
        }

        if kind == RuleKind::Exclude {
            return Ok(false);
        }

        Ok(rules.has_descendant_of(path))
    }

    fn pattern_matches(&self, kind: RuleKind, path: &str) -> Result<bool> {
        for rule in self.compiled(kind)?.iter() {
            if rule.matches(path) {
                return Ok(true);
            }
            // path may be an intermediate node above a matching leaf;
            // linear scan over the index
            if kind == RuleKind::Include
                && rule.is_pattern()
                && self
                    .full_paths
                    .iter()
                    .any(|full_path| rule.matches_beneath(path, full_path))
            {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter() -> PathFilter {
        PathFilter::with_cache(Arc::new(PatternCache::default()))
    }

    #[test]
    fn test_no_rules_keeps_everything() {
        let filter = filter();
        assert!(filter.apply("$", "anything").unwrap());
        assert!(filter.apply("$.a.b", "c").unwrap());
    }

    #[test]
    fn test_literal_include_exact_and_ancestors() {
        let mut filter = filter();
        filter.add_includes(["bar.zee"]);

        assert!(filter.apply("$.bar", "zee").unwrap());
        assert!(filter.apply("$", "bar").unwrap());
        assert!(!filter.apply("$.bar", "other").unwrap());
        assert!(!filter.apply("$", "foo").unwrap());
    }

    #[test]
    fn test_literal_include_does_not_admit_children() {
        let mut filter = filter();
        filter.add_includes(["bar"]);

        assert!(filter.apply("$", "bar").unwrap());
        assert!(!filter.apply("$.bar", "zee").unwrap());
    }

    #[test]
    fn test_exclusion_wins() {
        let mut filter = filter();
        filter.add_includes(["foo.bar"]).add_excludes(["foo.bar"]);

        assert!(!filter.apply("$.foo", "bar").unwrap());
        // excludes never use prefix matching
        assert!(filter.apply("$", "foo").unwrap());
    }

    #[test]
    fn test_absent_source_always_kept() {
        let mut filter = filter();
        filter.add_includes(["a"]).add_excludes(["b"]);

        assert!(filter.decide("$", "b", false).unwrap());
        assert!(filter.decide("$", "zzz", false).unwrap());
    }

    #[test]
    fn test_pattern_exclude() {
        let mut filter = filter();
        filter.add_excludes(["secret.*"]);

        assert!(!filter.apply("$.secret", "token").unwrap());
        assert!(filter.apply("$.public", "token").unwrap());
        assert!(filter.apply("$", "secret").unwrap());
    }

    #[test]
    fn test_pattern_include_ancestor_via_full_paths() {
        let mut filter = filter();
        filter.add_includes(["bar.*.name"]);
        filter.set_full_paths(["bar", "bar.zee", "bar.zee.name", "bar.other", "bar.other.id"]);

        assert!(filter.apply("$", "bar").unwrap());
        assert!(filter.apply("$.bar", "zee").unwrap());
        assert!(filter.apply("$.bar.zee", "name").unwrap());
        assert!(!filter.apply("$.bar", "other").unwrap());
        assert!(!filter.apply("$.bar.other", "id").unwrap());
    }

    #[test]
    fn test_pattern_exclude_ignores_full_paths() {
        let mut filter = filter();
        filter.add_excludes(["bar.*.name"]);
        filter.set_full_paths(["bar.zee.name"]);

        assert!(filter.apply("$.bar", "zee").unwrap());
        assert!(!filter.apply("$.bar.zee", "name").unwrap());
    }

    #[test]
    fn test_mixed_set_loses_prefix_matching() {
        // known quirk: a single wildcard switches the whole set to pattern
        // mode, so the literal `foo.bar` no longer keeps `foo` visible
        let mut filter = filter();
        filter.add_includes(["foo.bar", "zee.*"]);

        assert!(filter.apply("$.foo", "bar").unwrap());
        assert!(!filter.apply("$", "foo").unwrap());
        assert!(filter.apply("$.zee", "x").unwrap());

        let mut literal_only = PathFilter::with_cache(Arc::new(PatternCache::default()));
        literal_only.add_includes(["foo.bar"]);
        assert!(literal_only.apply("$", "foo").unwrap());
    }

    #[test]
    fn test_array_indices_erased() {
        let mut filter = filter();
        filter.add_includes(["items.name"]);

        assert!(filter.apply("$.items[0]", "name").unwrap());
        assert!(filter.apply("$.items[5]", "name").unwrap());
        assert!(!filter.apply("$.items[5]", "id").unwrap());
        assert!(filter.apply("$", "items").unwrap());
    }

    #[test]
    fn test_full_paths_replaced_not_added() {
        let mut filter = filter();
        filter.add_includes(["a.*.c"]);
        filter.set_full_paths(["a.b.c"]);
        assert!(filter.apply("$.a", "b").unwrap());

        filter.set_full_paths(["a.x.c"]);
        assert_eq!(filter.full_paths(), &["a.x.c".to_string()]);
        assert!(!filter.apply("$.a", "b").unwrap());
        assert!(filter.apply("$.a", "x").unwrap());
    }

    #[test]
    fn test_full_paths_are_normalized() {
        let mut filter = filter();
        filter.set_full_paths(["items[0]/name"]);
        assert_eq!(filter.full_paths(), &["items.name".to_string()]);
    }

    #[test]
    fn test_rules_added_after_first_match_take_effect() {
        let mut filter = filter();
        filter.add_excludes(["a.*"]);
        assert!(filter.apply("$.b", "x").unwrap());

        filter.add_excludes(["b.*"]);
        assert!(!filter.apply("$.b", "x").unwrap());
    }

    #[test]
    fn test_malformed_pattern_surfaces_on_use() {
        let mut filter = filter();
        filter.add_excludes(["a.[*"]);

        assert!(filter.validate().is_err());
        let err = filter.apply("$", "x").unwrap_err();
        assert_eq!(err.pattern(), Some("a.[*"));
        // absent source short-circuits before any rule is compiled
        assert!(filter.decide("$", "x", false).unwrap());
    }

    #[test]
    fn test_from_config() {
        let config = FilterConfig {
            includes: vec!["a/b;c".to_string()],
            excludes: vec!["c".to_string()],
            ..Default::default()
        };
        let filter = PathFilter::from_config(&config);

        assert!(filter.includes().contains("a.b"));
        assert!(filter.apply("$.a", "b").unwrap());
        assert!(!filter.apply("$", "c").unwrap());
    }
}
