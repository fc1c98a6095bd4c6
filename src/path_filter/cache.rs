// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// Shared cache of compiled rule lists

use dashmap::DashMap;
use once_cell::sync::Lazy;
use std::sync::Arc;
use tracing::{debug, trace};

use super::config::CacheConfig;
use super::error::Result;
use super::patterns::{compile_rules, CompiledRule};
use super::rules::RuleSet;

static GLOBAL_CACHE: Lazy<Arc<PatternCache>> =
    Lazy::new(|| Arc::new(PatternCache::new(CacheConfig::default())));

/// Compiled rule lists keyed by the sorted contents of the rule set
///
/// Safe to share between threads. When two passes race to compile the same
/// rule set, the first insert wins and both get the stored list.
#[derive(Debug)]
pub struct PatternCache {
    entries: DashMap<Arc<[String]>, Arc<[CompiledRule]>>,
    pub config: CacheConfig,
}

impl PatternCache {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            entries: DashMap::new(),
            config,
        }
    }

    /// Process-wide default instance
    pub fn global() -> Arc<PatternCache> {
        Arc::clone(&GLOBAL_CACHE)
    }

    /// Return the compiled rules for `rules`, compiling on a miss
    pub fn get_or_compile(&self, rules: &RuleSet) -> Result<Arc<[CompiledRule]>> {
        let key = rules.snapshot();

        // a zero-sized cache stores nothing
        if !self.config.enabled || self.config.max_entries == 0 {
            return Ok(compile_rules(key.iter())?.into());
        }

        if let Some(hit) = self.entries.get(&key) {
            trace!("Pattern cache hit for {} rules", key.len());
            return Ok(Arc::clone(hit.value()));
        }

        let compiled: Arc<[CompiledRule]> = compile_rules(key.iter())?.into();
        debug!("Compiled {} path rules", compiled.len());

        if self.entries.len() >= self.config.max_entries {
            self.evict_entries();
        }

        let stored = self.entries.entry(key).or_insert(compiled);
        Ok(Arc::clone(stored.value()))
    }

    /// Drop the entry for the current contents of `rules`
    pub fn invalidate(&self, rules: &RuleSet) -> bool {
        self.entries.remove(&rules.snapshot()).is_some()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove a tenth of the entries (at least one) when full
    fn evict_entries(&self) {
        let to_remove: Vec<Arc<[String]>> = self
            .entries
            .iter()
            .take((self.config.max_entries / 10).max(1))
            .map(|entry| Arc::clone(entry.key()))
            .collect();

        for key in to_remove {
            self.entries.remove(&key);
        }

        debug!(
            "Evicted compiled rule lists, cache size: {}",
            self.entries.len()
        );
    }
}

impl Default for PatternCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn rules(raw: &str) -> RuleSet {
        let mut set = RuleSet::new();
        set.add(raw);
        set
    }

    #[test]
    fn test_hit_returns_same_list() {
        let cache = PatternCache::default();
        let set = rules("a.*,b");

        let first = cache.get_or_compile(&set).unwrap();
        let second = cache.get_or_compile(&set).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_keyed_by_contents_not_identity() {
        let cache = PatternCache::default();
        let one = rules("a.*,b");
        let two = rules("b;a.*");

        let first = cache.get_or_compile(&one).unwrap();
        let second = cache.get_or_compile(&two).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_mutation_is_never_stale() {
        let cache = PatternCache::default();
        let mut set = rules("a.*");
        assert_eq!(cache.get_or_compile(&set).unwrap().len(), 1);

        set.add("b.*");
        let compiled = cache.get_or_compile(&set).unwrap();
        assert_eq!(compiled.len(), 2);
        assert!(compiled.iter().any(|r| r.matches("b.x")));
    }

    #[test]
    fn test_error_is_not_cached() {
        let cache = PatternCache::default();
        assert!(cache.get_or_compile(&rules("a.[*")).is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_invalidate_and_clear() {
        let cache = PatternCache::default();
        let set = rules("a.*");
        cache.get_or_compile(&set).unwrap();

        assert!(cache.invalidate(&set));
        assert!(!cache.invalidate(&set));

        cache.get_or_compile(&set).unwrap();
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_disabled_cache_stores_nothing() {
        let cache = PatternCache::new(CacheConfig {
            enabled: false,
            max_entries: 16,
        });
        assert_eq!(cache.get_or_compile(&rules("a.*")).unwrap().len(), 1);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_zero_capacity_stores_nothing() {
        let cache = PatternCache::new(CacheConfig {
            enabled: true,
            max_entries: 0,
        });
        let set = rules("a.*");
        let first = cache.get_or_compile(&set).unwrap();
        let second = cache.get_or_compile(&set).unwrap();

        assert_eq!(first.len(), 1);
        assert!(!Arc::ptr_eq(&first, &second));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_eviction_bounds_size() {
        let cache = PatternCache::new(CacheConfig {
            enabled: true,
            max_entries: 4,
        });
        for i in 0..20 {
            cache.get_or_compile(&rules(&format!("p{}.*", i))).unwrap();
        }
        assert!(cache.len() <= 4);
    }

    #[test]
    fn test_concurrent_population() {
        let cache = Arc::new(PatternCache::default());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || cache.get_or_compile(&rules("x.*.y,z")).unwrap())
            })
            .collect();

        let lists: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(cache.len(), 1);
        let stored = cache.get_or_compile(&rules("x.*.y,z")).unwrap();
        assert!(lists.iter().all(|l| l.len() == 2));
        assert!(lists.iter().all(|l| Arc::ptr_eq(l, &stored)));
    }
}
