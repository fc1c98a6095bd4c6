// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// Rule store: a set of canonical path specifiers

use once_cell::sync::OnceCell;
use std::collections::BTreeSet;
use std::sync::Arc;

use super::normalize::split_specifiers;

/// Wildcard marker that turns a specifier into a pattern
pub const WILDCARD: char = '*';

/// Returns true if any of the specifiers is a pattern
pub fn has_pattern<I, S>(specifiers: I) -> bool
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    specifiers
        .into_iter()
        .any(|s| s.as_ref().contains(WILDCARD))
}

/// A set of path specifiers, literal or wildcarded, in canonical form
///
/// The set only grows. Its contents are exposed as an immutable sorted
/// snapshot which serves as the key into the pattern cache, so a rule set
/// mutated after first use never maps to stale compiled rules.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    specifiers: BTreeSet<String>,
    has_pattern: bool,
    snapshot: OnceCell<Arc<[String]>>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add every specifier found in `raw`
    ///
    /// `raw` may hold several specifiers separated by `,`, `;` or `:`.
    /// Returns how many specifiers were new to the set.
    pub fn add(&mut self, raw: &str) -> usize {
        let mut added = 0;
        for spec in split_specifiers(raw) {
            if self.specifiers.contains(&spec) {
                continue;
            }
            self.has_pattern |= spec.contains(WILDCARD);
            self.specifiers.insert(spec);
            added += 1;
        }
        if added > 0 {
            self.snapshot.take();
        }
        added
    }

    /// Add a batch of raw specifier strings; returns how many were new
    pub fn extend<I, S>(&mut self, raw: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        raw.into_iter().map(|s| self.add(s.as_ref())).sum()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.specifiers.contains(path)
    }

    pub fn is_empty(&self) -> bool {
        self.specifiers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.specifiers.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.specifiers.iter().map(String::as_str)
    }

    /// True once any specifier containing `*` has been added
    pub fn has_pattern(&self) -> bool {
        self.has_pattern
    }

    /// True if some specifier lies strictly beneath `path`
    ///
    /// `a.b` has descendant `a.b.c`; it does not have `a.bc`.
    pub fn has_descendant_of(&self, path: &str) -> bool {
        let prefix = format!("{}.", path);
        // specifiers sharing a prefix are contiguous in sorted order
        self.specifiers
            .range(prefix.clone()..)
            .next()
            .is_some_and(|s| s.starts_with(&prefix))
    }

    /// Sorted, immutable view of the current contents
    pub fn snapshot(&self) -> Arc<[String]> {
        Arc::clone(
            self.snapshot
                .get_or_init(|| self.specifiers.iter().cloned().collect()),
        )
    }
}
